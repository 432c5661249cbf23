use std::{cmp::Ordering, collections::BTreeMap};

use chrono::NaiveTime;

use crate::models::activity::Activity;

/// Activities of one day, ordered by start time with unknown times last.
#[derive(Debug, Clone, PartialEq)]
pub struct DayPlan {
    pub day_no: u32,
    pub activities: Vec<Activity>,
}

/// The whole trip as day buckets in ascending numeric day order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DayTimeline {
    pub days: Vec<DayPlan>,
}

impl DayTimeline {
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Buckets activities by day and orders each bucket by start time.
/// Activities with a missing or unparsable start time sort last but stay
/// in their bucket. Deterministic and idempotent for a fixed input; the
/// relative order of equally-timed entries follows the input.
pub fn group(activities: &[Activity]) -> DayTimeline {
    let mut buckets: BTreeMap<u32, Vec<Activity>> = BTreeMap::new();
    for activity in activities {
        buckets
            .entry(activity.day())
            .or_default()
            .push(activity.clone());
    }

    let days = buckets
        .into_iter()
        .map(|(day_no, mut activities)| {
            activities.sort_by(|a, b| {
                let a_start = a.start_time.as_deref().and_then(parse_time);
                let b_start = b.start_time.as_deref().and_then(parse_time);
                match (a_start, b_start) {
                    (Some(a), Some(b)) => a.cmp(&b),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                }
            });
            DayPlan { day_no, activities }
        })
        .collect();

    DayTimeline { days }
}

/// Accepts the two formats the store emits for times.
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
}

/// Display label like "09:00" or "09:00 – 11:30". An unparsable start time
/// degrades to an empty label for that one activity; the activity itself
/// still renders.
pub fn time_label(activity: &Activity) -> String {
    let Some(start) = activity.start_time.as_deref().and_then(parse_time) else {
        return String::new();
    };
    let mut label = start.format("%H:%M").to_string();
    if let Some(end) = activity.end_time.as_deref().and_then(parse_time) {
        label.push_str(&format!(" – {}", end.format("%H:%M")));
    }
    label
}

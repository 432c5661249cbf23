use serde::{Deserialize, Serialize};

/// A planned activity, usually produced by the backend planner. Times come
/// over the wire as "HH:MM" or "HH:MM:SS" strings and stay strings here;
/// parsing happens at the timeline boundary so one bad value cannot poison
/// a whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(rename = "activity_id")]
    pub id: i64,
    #[serde(rename = "itinerary_id")]
    pub trip_id: i64,
    pub day_no: Option<u32>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub notes: Option<String>,
    pub place_id: Option<i64>,
    /// Absent cost contributes nothing to the budget ledger.
    pub estimated_cost: Option<f64>,
}

impl Activity {
    /// Day bucket this activity belongs to; anything unset or below 1
    /// lands on day 1.
    pub fn day(&self) -> u32 {
        match self.day_no {
            Some(d) if d >= 1 => d,
            _ => 1,
        }
    }

    pub fn label(&self) -> &str {
        self.notes.as_deref().unwrap_or("Activity")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityCreate {
    #[serde(rename = "itinerary_id")]
    pub trip_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_no: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_cost: Option<f64>,
}

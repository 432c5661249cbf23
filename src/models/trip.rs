use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::city::City;

/// The authoritative trip record as the store returns it. The wire format
/// still calls trips "itineraries".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    #[serde(rename = "itinerary_id")]
    pub id: i64,
    pub user_id: i64,
    pub title: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Tri-state: `None` means no budget was ever set, `Some(0.0)` is a real
    /// zero budget. Derived views must keep the two apart.
    pub total_budget: Option<f64>,
    #[serde(default)]
    pub cities: Vec<City>,
    // The store emits naive ISO timestamps, no offset.
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TripRecord {
    pub fn title_display(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled Trip")
    }

    pub fn city_names(&self) -> Vec<&str> {
        self.cities.iter().map(|c| c.name.as_str()).collect()
    }
}

/// What the builder page collects before anything is sent to the server.
/// Dates are optional here so validation can reject locally.
#[derive(Debug, Clone, Default)]
pub struct TripDraft {
    pub title: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub total_budget: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TripCreate {
    pub user_id: i64,
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_budget: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TripUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_budget: Option<f64>,
}

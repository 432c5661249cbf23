use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    #[serde(rename = "city_id")]
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub province: Option<String>,
}

/// A visitable place inside a city; the planner assigns these to days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    #[serde(rename = "place_id")]
    pub id: i64,
    pub city_id: i64,
    #[serde(rename = "place_name")]
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub duration: Option<f64>,
}

impl Place {
    pub fn category_display(&self) -> &str {
        self.category.as_deref().unwrap_or("General")
    }
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    #[serde(rename = "expense_id")]
    pub id: i64,
    #[serde(rename = "itinerary_id")]
    pub trip_id: i64,
    pub amount: f64,
    pub category: Option<String>,
    pub description: Option<String>,
}

impl Expense {
    pub fn category_display(&self) -> &str {
        self.category.as_deref().unwrap_or("General")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpenseCreate {
    #[serde(rename = "itinerary_id")]
    pub trip_id: i64,
    pub amount: f64,
    pub category: Option<String>,
    pub description: Option<String>,
}

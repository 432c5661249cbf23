use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(rename = "review_id")]
    pub id: i64,
    pub user_id: i64,
    pub place_id: i64,
    pub rating: i32,
    pub rating_comment: Option<String>,
    pub review_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewCreate {
    pub user_id: i64,
    pub place_id: i64,
    pub rating: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating_comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_date: Option<NaiveDate>,
}

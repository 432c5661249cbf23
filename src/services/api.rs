use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::{
    error::AppError,
    models::{
        activity::{Activity, ActivityCreate},
        city::{City, Place},
        expense::{Expense, ExpenseCreate},
        review::{Review, ReviewCreate},
        trip::{TripCreate, TripRecord, TripUpdate},
        user::{UserCreate, UserRead},
    },
};

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// What the external planner reports back; only the count is consumed.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanResponse {
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomPlanRequest {
    pub place_ids: Vec<i64>,
    pub daily_start_time: String,
    pub daily_budget: Option<f64>,
    pub max_places_per_day: u32,
}

/// The record store's request/response contract. Injected as a trait so
/// flows can be exercised against an in-memory double; the store itself is
/// a collaborator, never reimplemented here.
#[async_trait]
pub trait TripApi: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, AppError>;
    async fn register(&self, user: &UserCreate) -> Result<UserRead, AppError>;

    async fn list_trips(&self, token: &str) -> Result<Vec<TripRecord>, AppError>;
    async fn get_trip(&self, token: &str, trip_id: i64) -> Result<TripRecord, AppError>;
    async fn create_trip(&self, token: &str, req: &TripCreate) -> Result<TripRecord, AppError>;
    async fn update_trip(
        &self,
        token: &str,
        trip_id: i64,
        req: &TripUpdate,
    ) -> Result<TripRecord, AppError>;
    async fn delete_trip(&self, token: &str, trip_id: i64) -> Result<(), AppError>;

    async fn attach_city(&self, token: &str, trip_id: i64, city_id: i64)
        -> Result<(), AppError>;
    async fn detach_city(&self, token: &str, trip_id: i64, city_id: i64)
        -> Result<(), AppError>;

    async fn plan_automatic(
        &self,
        token: &str,
        trip_id: i64,
        daily_budget: Option<f64>,
        max_places_per_day: u32,
    ) -> Result<PlanResponse, AppError>;
    async fn plan_custom(
        &self,
        token: &str,
        trip_id: i64,
        req: &CustomPlanRequest,
    ) -> Result<PlanResponse, AppError>;

    async fn list_activities(&self, token: &str, trip_id: i64)
        -> Result<Vec<Activity>, AppError>;
    async fn create_activity(
        &self,
        token: &str,
        req: &ActivityCreate,
    ) -> Result<Activity, AppError>;

    async fn list_expenses(&self, token: &str, trip_id: i64) -> Result<Vec<Expense>, AppError>;
    async fn create_expense(&self, token: &str, req: &ExpenseCreate)
        -> Result<Expense, AppError>;

    async fn list_reviews(&self, token: &str, place_id: i64) -> Result<Vec<Review>, AppError>;
    async fn create_review(&self, token: &str, req: &ReviewCreate) -> Result<Review, AppError>;

    async fn list_cities(&self) -> Result<Vec<City>, AppError>;
    async fn list_places(&self, city_id: i64) -> Result<Vec<Place>, AppError>;
}

#[derive(Clone)]
pub struct HttpTripApi {
    base: Url,
    http: Client,
}

impl HttpTripApi {
    pub fn new(base: Url) -> Self {
        Self {
            base,
            http: Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, AppError> {
        self.base
            .join(path)
            .map_err(|err| AppError::Config(format!("invalid endpoint {path}: {err}")))
    }

    /// Maps the response onto the error taxonomy. A 401 always becomes
    /// `AppError::Auth` regardless of which endpoint produced it; other
    /// non-2xx statuses keep the collaborator's `detail` message when one
    /// is present.
    async fn check(response: Response) -> Result<Response, AppError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(AppError::Auth);
        }
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|body| {
                body.get("detail")
                    .and_then(|detail| detail.as_str().map(str::to_owned))
            })
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
        Err(AppError::Server {
            status: status.as_u16(),
            message,
        })
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
        Ok(Self::check(response).await?.json().await?)
    }

    async fn read_unit(response: Response) -> Result<(), AppError> {
        Self::check(response).await?;
        Ok(())
    }
}

#[async_trait]
impl TripApi for HttpTripApi {
    async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, AppError> {
        let response = self
            .http
            .post(self.endpoint("/auth/login")?)
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn register(&self, user: &UserCreate) -> Result<UserRead, AppError> {
        let response = self
            .http
            .post(self.endpoint("/auth/register")?)
            .json(user)
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn list_trips(&self, token: &str) -> Result<Vec<TripRecord>, AppError> {
        let response = self
            .http
            .get(self.endpoint("/itineraries")?)
            .bearer_auth(token)
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn get_trip(&self, token: &str, trip_id: i64) -> Result<TripRecord, AppError> {
        let response = self
            .http
            .get(self.endpoint(&format!("/itineraries/{trip_id}"))?)
            .bearer_auth(token)
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn create_trip(&self, token: &str, req: &TripCreate) -> Result<TripRecord, AppError> {
        let response = self
            .http
            .post(self.endpoint("/itineraries")?)
            .bearer_auth(token)
            .json(req)
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn update_trip(
        &self,
        token: &str,
        trip_id: i64,
        req: &TripUpdate,
    ) -> Result<TripRecord, AppError> {
        let response = self
            .http
            .put(self.endpoint(&format!("/itineraries/{trip_id}"))?)
            .bearer_auth(token)
            .json(req)
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn delete_trip(&self, token: &str, trip_id: i64) -> Result<(), AppError> {
        let response = self
            .http
            .delete(self.endpoint(&format!("/itineraries/{trip_id}"))?)
            .bearer_auth(token)
            .send()
            .await?;
        Self::read_unit(response).await
    }

    async fn attach_city(
        &self,
        token: &str,
        trip_id: i64,
        city_id: i64,
    ) -> Result<(), AppError> {
        let response = self
            .http
            .post(self.endpoint(&format!("/itineraries/{trip_id}/cities/{city_id}"))?)
            .bearer_auth(token)
            .send()
            .await?;
        Self::read_unit(response).await
    }

    async fn detach_city(
        &self,
        token: &str,
        trip_id: i64,
        city_id: i64,
    ) -> Result<(), AppError> {
        let response = self
            .http
            .delete(self.endpoint(&format!("/itineraries/{trip_id}/cities/{city_id}"))?)
            .bearer_auth(token)
            .send()
            .await?;
        Self::read_unit(response).await
    }

    async fn plan_automatic(
        &self,
        token: &str,
        trip_id: i64,
        daily_budget: Option<f64>,
        max_places_per_day: u32,
    ) -> Result<PlanResponse, AppError> {
        let mut query: Vec<(&str, String)> =
            vec![("max_places_per_day", max_places_per_day.to_string())];
        if let Some(budget) = daily_budget {
            query.push(("daily_budget", budget.to_string()));
        }
        let response = self
            .http
            .post(self.endpoint(&format!("/itineraries/{trip_id}/plan"))?)
            .query(&query)
            .bearer_auth(token)
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn plan_custom(
        &self,
        token: &str,
        trip_id: i64,
        req: &CustomPlanRequest,
    ) -> Result<PlanResponse, AppError> {
        let response = self
            .http
            .post(self.endpoint(&format!("/itineraries/{trip_id}/plan-custom"))?)
            .bearer_auth(token)
            .json(req)
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn list_activities(
        &self,
        token: &str,
        trip_id: i64,
    ) -> Result<Vec<Activity>, AppError> {
        let response = self
            .http
            .get(self.endpoint("/activities")?)
            .query(&[("itinerary_id", trip_id)])
            .bearer_auth(token)
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn create_activity(
        &self,
        token: &str,
        req: &ActivityCreate,
    ) -> Result<Activity, AppError> {
        let response = self
            .http
            .post(self.endpoint("/activities")?)
            .bearer_auth(token)
            .json(req)
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn list_expenses(&self, token: &str, trip_id: i64) -> Result<Vec<Expense>, AppError> {
        let response = self
            .http
            .get(self.endpoint("/expenses")?)
            .query(&[("itinerary_id", trip_id)])
            .bearer_auth(token)
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn create_expense(
        &self,
        token: &str,
        req: &ExpenseCreate,
    ) -> Result<Expense, AppError> {
        let response = self
            .http
            .post(self.endpoint("/expenses")?)
            .bearer_auth(token)
            .json(req)
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn list_reviews(&self, token: &str, place_id: i64) -> Result<Vec<Review>, AppError> {
        let response = self
            .http
            .get(self.endpoint("/reviews")?)
            .query(&[("place_id", place_id)])
            .bearer_auth(token)
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn create_review(&self, token: &str, req: &ReviewCreate) -> Result<Review, AppError> {
        let response = self
            .http
            .post(self.endpoint("/reviews")?)
            .bearer_auth(token)
            .json(req)
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn list_cities(&self) -> Result<Vec<City>, AppError> {
        let response = self.http.get(self.endpoint("/cities")?).send().await?;
        Self::read_json(response).await
    }

    async fn list_places(&self, city_id: i64) -> Result<Vec<Place>, AppError> {
        let response = self
            .http
            .get(self.endpoint("/places")?)
            .query(&[("city_id", city_id)])
            .send()
            .await?;
        Self::read_json(response).await
    }
}

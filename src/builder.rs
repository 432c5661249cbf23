use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    auth::{derive_user_id, SessionIdentity},
    cache::TripCache,
    error::AppError,
    models::trip::{TripCreate, TripDraft, TripRecord},
    services::api::{CustomPlanRequest, TripApi},
};

/// One city attachment that did not go through, with the reason kept so
/// callers can surface it instead of it dying in a log line.
#[derive(Debug, Clone)]
pub struct AttachFailure {
    pub city_id: i64,
    pub reason: String,
}

/// Aggregate outcome of a best-effort attachment batch. Every requested
/// city id ends up in exactly one of the two lists.
#[derive(Debug, Clone, Default)]
pub struct AttachReport {
    pub succeeded: Vec<i64>,
    pub failed: Vec<AttachFailure>,
}

impl AttachReport {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn failed_ids(&self) -> Vec<i64> {
        self.failed.iter().map(|f| f.city_id).collect()
    }
}

/// Result of a planner run. A planner failure leaves the trip valid with
/// whatever activities already exist, so it surfaces as a warning here
/// rather than an error.
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    pub count: u32,
    pub warning: Option<String>,
}

/// Everything the builder page produced in one flow.
#[derive(Debug, Clone)]
pub struct BuildSummary {
    pub trip: TripRecord,
    pub attachments: AttachReport,
    pub plan: Option<PlanOutcome>,
}

/// Orchestrates trip creation and the dependent attachment/planning steps.
/// Creation must succeed first; everything after it is best-effort, on the
/// grounds that losing a whole flow over one bad city attachment is worse
/// than reporting a partial result.
#[derive(Clone)]
pub struct TripBuilder {
    api: Arc<dyn TripApi>,
    session: SessionIdentity,
    cache: TripCache,
}

impl TripBuilder {
    pub fn new(api: Arc<dyn TripApi>, session: SessionIdentity, cache: TripCache) -> Self {
        Self {
            api,
            session,
            cache,
        }
    }

    /// Creates the trip record. Missing dates are rejected locally before
    /// any request goes out. On success the new record becomes the active
    /// trip before it is returned.
    pub async fn create(&self, draft: TripDraft) -> Result<TripRecord, AppError> {
        let start_date = draft
            .start_date
            .ok_or_else(|| AppError::validation("start date is required"))?;
        let end_date = draft
            .end_date
            .ok_or_else(|| AppError::validation("end date is required"))?;

        let token = self.session.require_token().await?;
        // The derived id only associates the record with its creator; the
        // server re-checks ownership on every call.
        let user_id = derive_user_id(&token).ok_or(AppError::Auth)?;

        let req = TripCreate {
            user_id,
            title: draft.title.unwrap_or_else(|| "My Trip".to_string()),
            start_date,
            end_date,
            total_budget: draft.total_budget,
        };
        let trip = self.api.create_trip(&token, &req).await?;
        info!(trip_id = trip.id, "trip created");
        self.cache.store_active(trip.clone()).await?;
        Ok(trip)
    }

    /// Attaches each city independently, in input order. One failure never
    /// aborts the rest: the trip already exists and stays valid. A 401
    /// still propagates, since no further attempt could succeed.
    pub async fn attach_cities(
        &self,
        trip_id: i64,
        city_ids: &[i64],
    ) -> Result<AttachReport, AppError> {
        let token = self.session.require_token().await?;
        let mut report = AttachReport::default();
        for &city_id in city_ids {
            match self.api.attach_city(&token, trip_id, city_id).await {
                Ok(()) => report.succeeded.push(city_id),
                Err(AppError::Auth) => return Err(AppError::Auth),
                Err(err) => {
                    warn!(trip_id, city_id, "city attachment failed: {err}");
                    report.failed.push(AttachFailure {
                        city_id,
                        reason: err.to_string(),
                    });
                }
            }
        }
        Ok(report)
    }

    /// Removes one previously attached city. Unlike attachment this is a
    /// single targeted action, so a failure is just an error.
    pub async fn detach_city(&self, trip_id: i64, city_id: i64) -> Result<(), AppError> {
        let token = self.session.require_token().await?;
        self.api.detach_city(&token, trip_id, city_id).await
    }

    /// Asks the external planner to fill the trip with activities. The
    /// planner is consumed, not implemented: only the created count comes
    /// back. Failure is a warning, never a rollback.
    pub async fn plan_automatic(
        &self,
        trip_id: i64,
        daily_budget: Option<f64>,
        max_places_per_day: u32,
    ) -> Result<PlanOutcome, AppError> {
        let token = self.session.require_token().await?;
        let result = self
            .api
            .plan_automatic(&token, trip_id, daily_budget, max_places_per_day)
            .await;
        Self::settle_plan(trip_id, result)
    }

    /// Explicit-selection planning path; same failure policy as
    /// [`plan_automatic`](Self::plan_automatic).
    pub async fn plan_custom(
        &self,
        trip_id: i64,
        req: &CustomPlanRequest,
    ) -> Result<PlanOutcome, AppError> {
        let token = self.session.require_token().await?;
        let result = self.api.plan_custom(&token, trip_id, req).await;
        Self::settle_plan(trip_id, result)
    }

    /// Whole builder-page flow: create, then attach the selected cities,
    /// then schedule the selected places. The dependent steps only start
    /// once the created trip's id is known.
    pub async fn build(
        &self,
        draft: TripDraft,
        city_ids: &[i64],
        place_ids: &[i64],
        daily_start_time: &str,
        max_places_per_day: u32,
    ) -> Result<BuildSummary, AppError> {
        let daily_budget = draft.total_budget;
        let trip = self.create(draft).await?;

        let attachments = self.attach_cities(trip.id, city_ids).await?;

        let plan = if place_ids.is_empty() {
            None
        } else {
            let req = CustomPlanRequest {
                place_ids: place_ids.to_vec(),
                daily_start_time: daily_start_time.to_string(),
                daily_budget,
                max_places_per_day,
            };
            Some(self.plan_custom(trip.id, &req).await?)
        };

        Ok(BuildSummary {
            trip,
            attachments,
            plan,
        })
    }

    fn settle_plan(
        trip_id: i64,
        result: Result<crate::services::api::PlanResponse, AppError>,
    ) -> Result<PlanOutcome, AppError> {
        match result {
            Ok(res) => Ok(PlanOutcome {
                count: res.count,
                warning: None,
            }),
            Err(AppError::Auth) => Err(AppError::Auth),
            Err(err) => {
                warn!(trip_id, "planning failed: {err}");
                Ok(PlanOutcome {
                    count: 0,
                    warning: Some(err.to_string()),
                })
            }
        }
    }
}

//! UI-agnostic controller functions behind the independently-loaded pages.
//! Each one does the same dance: require a token, fetch fresh collections,
//! overwrite the cache through the guarded path, then hand the pure
//! transforms' output to whatever renders it.

use tracing::debug;

use crate::{
    budget::{self, BudgetLedger, CostLine},
    error::AppError,
    models::{
        activity::{Activity, ActivityCreate},
        city::{City, Place},
        expense::{Expense, ExpenseCreate},
        trip::{TripRecord, TripUpdate},
    },
    state::AppState,
    timeline::{self, DayTimeline},
};

#[derive(Debug, Clone)]
pub struct TripDetails {
    pub trip: TripRecord,
    pub timeline: DayTimeline,
}

#[derive(Debug, Clone)]
pub struct BudgetOverview {
    pub trip: TripRecord,
    pub ledger: BudgetLedger,
    pub activity_lines: Vec<CostLine>,
    pub expenses: Vec<Expense>,
}

/// Dashboard page: the all-trips list, always fetched fresh (the cache
/// only ever speaks for the single active trip).
pub async fn dashboard(state: &AppState) -> Result<Vec<TripRecord>, AppError> {
    let token = state.session.require_token().await?;
    state.api.list_trips(&token).await
}

/// Selecting a trip card on the dashboard makes that trip active for
/// every subsequently loaded page.
pub async fn open_trip(state: &AppState, trip: TripRecord) -> Result<(), AppError> {
    state.cache.store_active(trip).await
}

/// Details page: refetch the active trip and its activities, refresh the
/// cache, group the timeline.
pub async fn trip_details(state: &AppState) -> Result<TripDetails, AppError> {
    let token = state.session.require_token().await?;
    let trip_id = active_trip_id(state).await?;

    let (trip, activities) = tokio::join!(
        state.api.get_trip(&token, trip_id),
        state.api.list_activities(&token, trip_id),
    );
    let trip = trip?;
    let activities = activities?;

    // Authoritative fetch overwrites the snapshot before anything derives
    // display data from it. A stale response for a different trip is
    // dropped inside the guarded write.
    state.cache.refresh_if_active(trip.clone()).await?;

    Ok(TripDetails {
        timeline: timeline::group(&activities),
        trip,
    })
}

/// Expenses page: pulls the three collections together and reconciles
/// them into one ledger.
pub async fn budget_overview(state: &AppState) -> Result<BudgetOverview, AppError> {
    let token = state.session.require_token().await?;
    let trip_id = active_trip_id(state).await?;

    let (trip, activities, expenses) = tokio::join!(
        state.api.get_trip(&token, trip_id),
        state.api.list_activities(&token, trip_id),
        state.api.list_expenses(&token, trip_id),
    );
    let trip = trip?;
    let activities = activities?;
    let expenses = expenses?;

    state.cache.refresh_if_active(trip.clone()).await?;

    Ok(BudgetOverview {
        ledger: budget::reconcile(&trip, &activities, &expenses),
        activity_lines: budget::activity_cost_lines(&activities),
        trip,
        expenses,
    })
}

/// Dashboard delete action. Removing the trip that is currently active
/// also drops the pointer, so no later page load resurrects the deleted
/// record from the snapshot.
pub async fn remove_trip(state: &AppState, trip_id: i64) -> Result<(), AppError> {
    let token = state.session.require_token().await?;
    state.api.delete_trip(&token, trip_id).await?;
    state.cache.hydrate().await?;
    if state.cache.active_id() == Some(trip_id) {
        state.cache.clear().await?;
    }
    Ok(())
}

/// Expenses page budget edit: rewrites the active trip's total budget and
/// folds the updated record back into the snapshot.
pub async fn set_budget(state: &AppState, amount: f64) -> Result<TripRecord, AppError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(AppError::validation("budget must be zero or more"));
    }
    let token = state.session.require_token().await?;
    let trip_id = active_trip_id(state).await?;
    let update = TripUpdate {
        total_budget: Some(amount),
        ..TripUpdate::default()
    };
    let trip = state.api.update_trip(&token, trip_id, &update).await?;
    state.cache.refresh_if_active(trip.clone()).await?;
    Ok(trip)
}

/// Details page manual-entry form: one free-form activity on the active
/// trip, outside anything the planner produced.
pub async fn add_activity(
    state: &AppState,
    day_no: Option<u32>,
    start_time: Option<String>,
    end_time: Option<String>,
    notes: Option<String>,
    estimated_cost: Option<f64>,
) -> Result<Activity, AppError> {
    if let Some(cost) = estimated_cost {
        if !cost.is_finite() || cost < 0.0 {
            return Err(AppError::validation("estimated cost must be zero or more"));
        }
    }
    let token = state.session.require_token().await?;
    let trip_id = active_trip_id(state).await?;
    let req = ActivityCreate {
        trip_id,
        place_id: None,
        day_no,
        start_time,
        end_time,
        notes: notes.filter(|n| !n.trim().is_empty()),
        estimated_cost,
    };
    state.api.create_activity(&token, &req).await
}

/// Records a manual expense against the active trip. Callers rerun
/// [`budget_overview`] afterwards; nothing is patched incrementally.
pub async fn add_expense(
    state: &AppState,
    amount: f64,
    category: Option<String>,
    description: Option<String>,
) -> Result<Expense, AppError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(AppError::validation("expense amount must be zero or more"));
    }
    let token = state.session.require_token().await?;
    let trip_id = active_trip_id(state).await?;
    let req = ExpenseCreate {
        trip_id,
        amount,
        category: category.filter(|c| !c.trim().is_empty()),
        description: description.filter(|d| !d.trim().is_empty()),
    };
    state.api.create_expense(&token, &req).await
}

/// Builder page: selectable cities. Public catalogue, no token needed.
pub async fn city_options(state: &AppState) -> Result<Vec<City>, AppError> {
    state.api.list_cities().await
}

/// Builder page: places for the selected cities, deduplicated by id. A
/// city whose place list fails to load contributes nothing; the rest of
/// the selection still works.
pub async fn place_options(state: &AppState, city_ids: &[i64]) -> Result<Vec<Place>, AppError> {
    let mut places: Vec<Place> = Vec::new();
    for &city_id in city_ids {
        match state.api.list_places(city_id).await {
            Ok(batch) => {
                for place in batch {
                    if !places.iter().any(|p| p.id == place.id) {
                        places.push(place);
                    }
                }
            }
            Err(err) => debug!(city_id, "skipping places for city: {err}"),
        }
    }
    Ok(places)
}

async fn active_trip_id(state: &AppState) -> Result<i64, AppError> {
    state.cache.hydrate().await?;
    state
        .cache
        .active_id()
        .ok_or_else(|| AppError::validation("no trip selected; open one from the dashboard"))
}

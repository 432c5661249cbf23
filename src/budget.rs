use crate::models::{activity::Activity, expense::Expense, trip::TripRecord};

/// Computed budget summary for one trip. Derived on every page load and on
/// every expense/activity change; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetLedger {
    /// Tri-state, carried through from the trip record: unset, zero and
    /// positive stay distinct.
    pub total_budget: Option<f64>,
    pub activity_cost: f64,
    pub manual_cost: f64,
    /// Unset whenever the total budget is unset. May be negative; an
    /// overspent trip is a valid state, not an error.
    pub remaining: Option<f64>,
}

impl BudgetLedger {
    pub fn spent(&self) -> f64 {
        self.activity_cost + self.manual_cost
    }

    pub fn is_overspent(&self) -> bool {
        self.remaining.is_some_and(|r| r < 0.0)
    }
}

/// One line of the per-activity cost breakdown on the expenses page.
#[derive(Debug, Clone, PartialEq)]
pub struct CostLine {
    pub label: String,
    pub day_no: u32,
    pub amount: f64,
}

/// Folds the three independently-fetched collections into one ledger.
/// Pure: callers rerun it in full after any change rather than patching
/// a previous result.
pub fn reconcile(trip: &TripRecord, activities: &[Activity], expenses: &[Expense]) -> BudgetLedger {
    let activity_cost: f64 = activities
        .iter()
        .filter_map(|act| act.estimated_cost)
        .sum();
    let manual_cost: f64 = expenses.iter().map(|exp| exp.amount).sum();

    BudgetLedger {
        total_budget: trip.total_budget,
        activity_cost,
        manual_cost,
        remaining: trip
            .total_budget
            .map(|total| total - (activity_cost + manual_cost)),
    }
}

/// Breakdown of which activities carry a cost, in list order. Zero-cost
/// and costless activities are omitted here (they still appear on the
/// timeline).
pub fn activity_cost_lines(activities: &[Activity]) -> Vec<CostLine> {
    activities
        .iter()
        .filter_map(|act| {
            let amount = act.estimated_cost?;
            if amount <= 0.0 {
                return None;
            }
            Some(CostLine {
                label: act.label().to_string(),
                day_no: act.day(),
                amount,
            })
        })
        .collect()
}

/// Display form that keeps the tri-state honest: an unset amount renders
/// as "not set", never as a zero.
pub fn amount_label(amount: Option<f64>) -> String {
    match amount {
        Some(value) => format!("{value:.0}"),
        None => "not set".to_string(),
    }
}

use chrono::NaiveDate;
use tracing::info;
use wayfarer::builder::BuildSummary;
use wayfarer::config::AppConfig;
use wayfarer::error::AppError;
use wayfarer::models::trip::TripDraft;
use wayfarer::pages;
use wayfarer::state::AppState;
use wayfarer::timeline;

// Defaults the details page uses for one-click planning.
const AUTO_PLAN_DAILY_BUDGET: f64 = 8000.0;
const AUTO_PLAN_MAX_PER_DAY: u32 = 3;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_logging();

    let config = AppConfig::from_env()?;
    let state = AppState::new(config);
    state.store.ensure_structure().await?;
    info!("talking to {}", state.config.api_base);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = args.first().map(String::as_str).unwrap_or("help");

    let outcome = run(&state, command, &args[1.min(args.len())..]).await;
    if let Err(err) = &outcome {
        if err.requires_sign_in() {
            // Mirrors the page behavior on a 401: drop local session state
            // and send the user back to sign-in.
            state.session.sign_out(&state.cache).await?;
            eprintln!("Session expired or missing. Please sign in again.");
            return Ok(());
        }
    }
    outcome
}

async fn run(state: &AppState, command: &str, args: &[String]) -> Result<(), AppError> {
    match command {
        "login" => {
            let [username, password] = expect_args::<2>(args, "login <email> <password>")?;
            state
                .session
                .sign_in(state.api.as_ref(), &username, &password)
                .await?;
            let user_id = state.session.user_id().await?;
            println!("Signed in (user id: {})", display_id(user_id));
        }
        "dashboard" => {
            let trips = pages::dashboard(state).await?;
            println!("You have {} saved trip(s).", trips.len());
            for trip in trips {
                println!(
                    "  [{}] {}  {} – {}",
                    trip.id,
                    trip.title_display(),
                    trip.start_date,
                    trip.end_date
                );
            }
        }
        "open" => {
            let [raw_id] = expect_args::<1>(args, "open <trip-id>")?;
            let trip_id: i64 = raw_id
                .parse()
                .map_err(|_| AppError::validation("trip id must be a number"))?;
            let token = state.session.require_token().await?;
            let trip = state.api.get_trip(&token, trip_id).await?;
            pages::open_trip(state, trip).await?;
            println!("Trip {trip_id} is now active.");
        }
        "create" => {
            let [title, start, end] = expect_args::<3>(args, "create <title> <start> <end>")?;
            let draft = TripDraft {
                title: Some(title),
                start_date: parse_date(&start)?,
                end_date: parse_date(&end)?,
                total_budget: args.get(3).and_then(|raw| raw.parse().ok()),
            };
            let summary = state.builder().build(draft, &[], &[], "09:00", 3).await?;
            print_build_summary(&summary);
        }
        "delete" => {
            let [raw_id] = expect_args::<1>(args, "delete <trip-id>")?;
            let trip_id: i64 = raw_id
                .parse()
                .map_err(|_| AppError::validation("trip id must be a number"))?;
            pages::remove_trip(state, trip_id).await?;
            println!("Trip {trip_id} deleted.");
        }
        "attach" => {
            let trip_id = require_active(state).await?;
            let city_ids: Vec<i64> = args.iter().filter_map(|raw| raw.parse().ok()).collect();
            let report = state.builder().attach_cities(trip_id, &city_ids).await?;
            println!("Attached: {:?}", report.succeeded);
            for failure in &report.failed {
                println!("Could not attach city {}: {}", failure.city_id, failure.reason);
            }
        }
        "detach" => {
            let [raw_city] = expect_args::<1>(args, "detach <city-id>")?;
            let city_id: i64 = raw_city
                .parse()
                .map_err(|_| AppError::validation("city id must be a number"))?;
            let trip_id = require_active(state).await?;
            state.builder().detach_city(trip_id, city_id).await?;
            println!("Detached city {city_id}.");
        }
        "plan" => {
            let trip_id = require_active(state).await?;
            let outcome = state
                .builder()
                .plan_automatic(trip_id, Some(AUTO_PLAN_DAILY_BUDGET), AUTO_PLAN_MAX_PER_DAY)
                .await?;
            match outcome.warning {
                Some(warning) => println!("Planner warning: {warning}"),
                None => println!("Success! Created {} activities.", outcome.count),
            }
        }
        "details" => {
            let details = pages::trip_details(state).await?;
            println!("{}", details.trip.title_display());
            let cities = details.trip.city_names();
            if !cities.is_empty() {
                println!("Cities: {}", cities.join(", "));
            }
            if details.timeline.is_empty() {
                println!("No activities planned yet.");
            }
            for day in &details.timeline.days {
                println!("Day {}", day.day_no);
                for activity in &day.activities {
                    let label = timeline::time_label(activity);
                    if label.is_empty() {
                        println!("  {}", activity.label());
                    } else {
                        println!("  {}  {}", label, activity.label());
                    }
                }
            }
        }
        "budget" => {
            let overview = pages::budget_overview(state).await?;
            let ledger = &overview.ledger;
            println!("Budget for: {}", overview.trip.title_display());
            println!("  total:      {}", wayfarer::budget::amount_label(ledger.total_budget));
            println!("  activities: {:.0}", ledger.activity_cost);
            println!("  manual:     {:.0}", ledger.manual_cost);
            println!("  spent:      {:.0}", ledger.spent());
            println!(
                "  remaining:  {}{}",
                wayfarer::budget::amount_label(ledger.remaining),
                if ledger.is_overspent() { "  (over budget)" } else { "" }
            );
            for line in &overview.activity_lines {
                println!("  day {}  {}: {:.0}", line.day_no, line.label, line.amount);
            }
            for expense in &overview.expenses {
                println!("  {}: {:.0}", expense.category_display(), expense.amount);
            }
        }
        "cities" => {
            let cities = pages::city_options(state).await?;
            for city in cities {
                println!("  [{}] {}", city.id, city.name);
            }
        }
        "places" => {
            let city_ids: Vec<i64> = args.iter().filter_map(|raw| raw.parse().ok()).collect();
            let places = pages::place_options(state, &city_ids).await?;
            for place in places {
                println!("  [{}] {} ({})", place.id, place.name, place.category_display());
            }
        }
        "set-budget" => {
            let [raw_amount] = expect_args::<1>(args, "set-budget <amount>")?;
            let amount: f64 = raw_amount
                .parse()
                .map_err(|_| AppError::validation("amount must be a number"))?;
            let trip = pages::set_budget(state, amount).await?;
            println!(
                "Budget for {} is now {}",
                trip.title_display(),
                wayfarer::budget::amount_label(trip.total_budget)
            );
        }
        "add-activity" => {
            let [raw_day] = expect_args::<1>(args, "add-activity <day> [start] [note] [cost]")?;
            let day: u32 = raw_day
                .parse()
                .map_err(|_| AppError::validation("day must be a number"))?;
            let activity = pages::add_activity(
                state,
                Some(day),
                args.get(1).cloned(),
                None,
                args.get(2).cloned(),
                args.get(3).and_then(|raw| raw.parse().ok()),
            )
            .await?;
            println!("Added activity {} on day {}", activity.id, activity.day());
        }
        "add-expense" => {
            let [raw_amount] = expect_args::<1>(args, "add-expense <amount> [category] [note]")?;
            let amount: f64 = raw_amount
                .parse()
                .map_err(|_| AppError::validation("amount must be a number"))?;
            let expense = pages::add_expense(
                state,
                amount,
                args.get(1).cloned(),
                args.get(2).cloned(),
            )
            .await?;
            println!("Recorded expense {} ({:.0})", expense.id, expense.amount);
        }
        "logout" => {
            state.session.sign_out(&state.cache).await?;
            println!("Signed out.");
        }
        _ => {
            println!(
                "usage: wayfarer <login|dashboard|open|create|delete|attach|detach|plan|details|add-activity|budget|set-budget|add-expense|cities|places|logout>"
            );
        }
    }
    Ok(())
}

async fn require_active(state: &AppState) -> Result<i64, AppError> {
    state.cache.hydrate().await?;
    state
        .cache
        .active_id()
        .ok_or_else(|| AppError::validation("no trip selected; run `wayfarer open <id>` first"))
}

fn expect_args<const N: usize>(args: &[String], usage: &str) -> Result<[String; N], AppError> {
    if args.len() < N {
        return Err(AppError::validation(format!("usage: wayfarer {usage}")));
    }
    Ok(std::array::from_fn(|i| args[i].clone()))
}

fn parse_date(raw: &str) -> Result<Option<NaiveDate>, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| AppError::validation(format!("invalid date: {raw} (expected YYYY-MM-DD)")))
}

fn print_build_summary(summary: &BuildSummary) {
    println!("Created trip {} ({})", summary.trip.id, summary.trip.title_display());
    if !summary.attachments.all_succeeded() {
        for failure in &summary.attachments.failed {
            println!("Could not attach city {}: {}", failure.city_id, failure.reason);
        }
    }
    if let Some(plan) = &summary.plan {
        match &plan.warning {
            Some(warning) => println!("Planner warning: {warning}"),
            None => println!("Scheduled {} activities.", plan.count),
        }
    }
}

fn display_id(id: Option<i64>) -> String {
    id.map(|v| v.to_string()).unwrap_or_else(|| "unknown".into())
}

fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,wayfarer=debug".into());

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}

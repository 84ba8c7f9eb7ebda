use crate::infra::InMemoryStateStore;
use chrono::{Local, NaiveDate};
use clap::Args;
use leo_rewards::config::AppConfig;
use leo_rewards::error::AppError;
use leo_rewards::progression::{
    ChildId, ChildProfile, DayLog, ProgressionService, TransitionView,
};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Child date of birth (YYYY-MM-DD). Defaults to an eligible age.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) date_of_birth: Option<NaiveDate>,
    /// Day being logged (defaults to today).
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) date: Option<NaiveDate>,
    /// Measured brushing duration for the timer bonus, in seconds.
    #[arg(long, default_value_t = 118)]
    pub(crate) timer_seconds: u32,
    /// Skip the chest portion of the demo.
    #[arg(long)]
    pub(crate) skip_chest: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        date_of_birth,
        date,
        timer_seconds,
        skip_chest,
    } = args;

    let config = AppConfig::load()?;
    let today = date.unwrap_or_else(|| Local::now().date_naive());
    let date_of_birth = date_of_birth
        .or_else(|| today.checked_sub_months(chrono::Months::new(72)));

    let store = Arc::new(InMemoryStateStore::default());
    let service = ProgressionService::new(store, config.engine.engine_config());

    let child_id = ChildId::new("demo-child");
    service
        .upsert_child(ChildProfile {
            id: child_id.clone(),
            date_of_birth,
        })
        .map_err(store_error)?;

    println!("Brushing rewards demo");
    println!("Day: {today}");

    let view = service
        .log_brushing(
            &child_id,
            today,
            DayLog {
                am: true,
                pm: false,
            },
            today,
        )
        .map_err(store_error)?;
    render_transition("Morning brush logged", &view);

    let view = service
        .log_brushing(&child_id, today, DayLog { am: true, pm: true }, today)
        .map_err(store_error)?;
    render_transition("Evening brush logged", &view);

    let view = service
        .timer_complete(&child_id, today, timer_seconds, None, today)
        .map_err(store_error)?;
    render_transition(
        &format!("Timer finished at {timer_seconds}s"),
        &view,
    );

    let rewards = service.legacy_rewards(&child_id).map_err(store_error)?;
    println!(
        "\nLegacy ledger: {} tokens, {} badges",
        rewards.tokens,
        rewards.badges.len()
    );

    if skip_chest {
        return Ok(());
    }

    let snapshot = service.progression(&child_id, today).map_err(store_error)?;
    println!("\nToday's chest");
    for choice in &snapshot.chest.choices {
        println!("- {} ({})", choice.title, choice.subtitle);
    }

    let Some(choice) = snapshot.chest.choices.first() else {
        println!("No chest options available");
        return Ok(());
    };

    let view = service
        .open_chest(&child_id, today, &choice.id, today)
        .map_err(store_error)?;
    render_transition(&format!("Chest opened: {}", choice.title), &view);

    let record = &view.progression.record;
    println!(
        "\nEnd of day: {} points (level {}), streak {}, league {}",
        record.xp,
        view.progression.level.level,
        record.streak,
        record.league.label()
    );

    Ok(())
}

fn render_transition(label: &str, view: &TransitionView) {
    if view.outcome.is_applied() {
        println!("- {label}: +{} points", view.outcome.points_awarded());
    } else {
        println!("- {label}: no change");
    }
}

fn store_error(err: leo_rewards::progression::ProgressionServiceError) -> AppError {
    match err {
        leo_rewards::progression::ProgressionServiceError::Store(source) => {
            AppError::Store(source)
        }
    }
}

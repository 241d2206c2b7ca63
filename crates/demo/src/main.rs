mod synth;

use anyhow::Context;
use sched_core::{Deadline, SearchParams, Solver};
use solver_heur::HeurSolver;
use std::str::FromStr;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(v) => v.parse().with_context(|| format!("invalid {key}={v}")),
        Err(_) => Ok(default),
    }
}

fn load_params() -> anyhow::Result<SearchParams> {
    let mut params = match std::env::var("TIMETABLE__SEARCH__PARAMS") {
        Ok(raw) => serde_json::from_str(&raw).context("TIMETABLE__SEARCH__PARAMS is not valid JSON")?,
        Err(_) => SearchParams::default(),
    };
    params.seed = env_or("TIMETABLE__SEARCH__SEED", params.seed)?;
    sched_core::validate_params(&params)?;
    Ok(params)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let params = load_params()?;
    let shape = synth::Shape {
        courses: env_or("TIMETABLE__DEMO__COURSES", 40)?,
        rooms: env_or("TIMETABLE__DEMO__ROOMS", 6)?,
        slots: env_or("TIMETABLE__DEMO__SLOTS", 10)?,
        locations: env_or("TIMETABLE__DEMO__LOCATIONS", 3)?,
    };
    let budget_ms: u64 = env_or("TIMETABLE__SEARCH__BUDGET_MS", 2_000)?;

    let catalog = synth::catalog(shape, params.seed);
    sched_core::validate(&catalog)?;
    tracing::info!(?shape, seed = params.seed, budget_ms, "instance generated");

    let solver = HeurSolver::with_params(params);
    let outcome = solver.solve(&catalog, Deadline::after(Duration::from_millis(budget_ms)));

    let scores = catalog.scores(&outcome.schedule);
    tracing::info!(
        status = ?outcome.status,
        objective = outcome.objective,
        placed = outcome.placed,
        total = outcome.total,
        location_matches = scores.location_matches,
        infeasible = scores.infeasible_placements,
        "search finished"
    );

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

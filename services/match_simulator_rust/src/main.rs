//! Match Simulator Service
//!
//! Simulates one football match and writes it to the match store.
//!
//! This service:
//! - Picks two distinct clubs (or takes HOME_TEAM / AWAY_TEAM)
//! - Makes sure both clubs and their squads exist
//! - Generates goals and cards, persists them in minute order and keeps score
//! - Prints the event log and the final score
//!
//! The database pool is closed before exit on success and on failure.

use anyhow::{Context, Result};
use dotenv::dotenv;
use match_simulator_rust::{render_report, run_simulation, SimulatorConfig};
use matchday_core::db::{check_pool_health, create_pool, ensure_schema, PgStore};
use matchday_core::{MemoryStore, SimulationReport};
use sqlx::PgPool;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Match Simulator...");

    let config = SimulatorConfig::from_env();

    let outcome = if config.dry_run {
        info!("DRY_RUN enabled, using the in-memory store");
        run_simulation(&MemoryStore::new(), &config)
            .await
            .context("Match simulation failed")
    } else {
        let pool = create_pool(&config.database_url, &config.pool).await?;
        let outcome = run_against_pool(&pool, &config).await;
        pool.close().await;
        info!("Database pool closed");
        outcome
    };

    match outcome {
        Ok(report) => {
            println!("{}", render_report(&report));
            info!("Match simulation completed.");
            Ok(())
        }
        Err(e) => {
            error!("Error simulating match: {:#}", e);
            Err(e)
        }
    }
}

async fn run_against_pool(pool: &PgPool, config: &SimulatorConfig) -> Result<SimulationReport> {
    check_pool_health(pool).await?;
    ensure_schema(pool).await?;

    let store = PgStore::new(pool.clone());
    run_simulation(&store, config)
        .await
        .context("Match simulation failed")
}

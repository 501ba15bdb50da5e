//! Single simulation run

use crate::config::SimulatorConfig;
use matchday_core::team_catalog::pick_fixture;
use matchday_core::{DataGateway, EventGenerator, MatchSimulator, Result, SimulationReport};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt::Write;
use tracing::info;

/// Seeded RNG when a seed is configured, OS entropy otherwise.
pub fn build_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => {
            info!("Using simulation seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    }
}

/// Pick (or take) the fixture and simulate one match against `gateway`.
pub async fn run_simulation<G: DataGateway + ?Sized>(
    gateway: &G,
    config: &SimulatorConfig,
) -> Result<SimulationReport> {
    let mut rng = build_rng(config.seed);
    let fixture = match &config.fixture {
        Some(fixture) => fixture.clone(),
        None => pick_fixture(&mut rng),
    };
    info!(
        "Simulating {} ({}) vs {} ({})",
        fixture.home.name, fixture.home.country, fixture.away.name, fixture.away.country
    );

    MatchSimulator::new(gateway, EventGenerator::new(config.events.clone()))
        .simulate(&fixture, &mut rng)
        .await
}

/// Event log plus the final score line, one event per line.
pub fn render_report(report: &SimulationReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Match #{}: team #{} vs team #{}",
        report.match_id, report.home_team, report.away_team
    );
    for event in &report.events {
        let _ = writeln!(
            out,
            "{}': player {} - {}",
            event.minute, event.player_id, event.event_type
        );
    }
    let _ = write!(out, "Final score: {}", report.final_score());
    out
}

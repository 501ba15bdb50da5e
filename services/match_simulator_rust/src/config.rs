//! Configuration loading for the match simulator
//!
//! Everything comes from the environment (a `.env` file is honoured):
//! - Database connection and pool sizing
//! - Optional RNG seed for reproducible runs
//! - Optional explicit fixture instead of a random pick
//! - Optional overrides for per-kind event counts

use matchday_core::db::pool::{load_database_url, DbPoolConfig};
use matchday_core::simulation::events::{
    DEFAULT_GOALS, DEFAULT_RED_CARDS, DEFAULT_YELLOW_CARDS,
};
use matchday_core::team_catalog::get_club_config;
use matchday_core::{EventGenerationConfig, Fixture, TeamSpec};
use std::env;
use std::ops::RangeInclusive;
use tracing::warn;

/// Country used for an explicitly configured team that is not in the club catalog.
pub const UNKNOWN_COUNTRY: &str = "Unknown";

#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    pub database_url: String,
    pub pool: DbPoolConfig,
    /// Run against the in-memory store instead of PostgreSQL.
    pub dry_run: bool,
    pub seed: Option<u64>,
    /// `None` means pick two distinct clubs at random.
    pub fixture: Option<Fixture>,
    pub events: EventGenerationConfig,
}

impl SimulatorConfig {
    /// Load configuration from environment variables with sensible defaults
    pub fn from_env() -> Self {
        let var = |name: &str| env::var(name).ok();

        Self {
            database_url: load_database_url(),
            pool: DbPoolConfig::from_env(),
            dry_run: var("DRY_RUN")
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            seed: var("SIMULATION_SEED").and_then(|v| v.parse().ok()),
            fixture: parse_fixture(
                var("HOME_TEAM").as_deref(),
                var("HOME_COUNTRY").as_deref(),
                var("AWAY_TEAM").as_deref(),
                var("AWAY_COUNTRY").as_deref(),
            ),
            events: EventGenerationConfig {
                goals: parse_count_range(
                    "GOALS",
                    var("GOALS_MIN").as_deref(),
                    var("GOALS_MAX").as_deref(),
                    DEFAULT_GOALS,
                ),
                yellow_cards: parse_count_range(
                    "YELLOW_CARDS",
                    var("YELLOW_CARDS_MIN").as_deref(),
                    var("YELLOW_CARDS_MAX").as_deref(),
                    DEFAULT_YELLOW_CARDS,
                ),
                red_cards: parse_count_range(
                    "RED_CARDS",
                    var("RED_CARDS_MIN").as_deref(),
                    var("RED_CARDS_MAX").as_deref(),
                    DEFAULT_RED_CARDS,
                ),
            },
        }
    }
}

/// Build an inclusive count range from optional bounds.
///
/// A missing bound keeps the default; an unparsable or inverted range falls
/// back to the default as a whole.
pub fn parse_count_range(
    label: &str,
    min: Option<&str>,
    max: Option<&str>,
    default: RangeInclusive<u32>,
) -> RangeInclusive<u32> {
    let parse = |raw: Option<&str>, fallback: u32| match raw {
        None => Some(fallback),
        Some(v) => v.trim().parse::<u32>().ok(),
    };

    match (parse(min, *default.start()), parse(max, *default.end())) {
        (Some(lo), Some(hi)) if lo <= hi => lo..=hi,
        _ => {
            warn!(
                "Ignoring invalid {} range (min={:?}, max={:?}), using {:?}",
                label, min, max, default
            );
            default
        }
    }
}

/// Explicit fixture from team names; both names are required.
///
/// Countries default to the club catalog entry, then to `UNKNOWN_COUNTRY`.
pub fn parse_fixture(
    home_team: Option<&str>,
    home_country: Option<&str>,
    away_team: Option<&str>,
    away_country: Option<&str>,
) -> Option<Fixture> {
    match (home_team, away_team) {
        (Some(home), Some(away)) if !home.trim().is_empty() && !away.trim().is_empty() => Some(
            Fixture::new(team_spec(home, home_country), team_spec(away, away_country)),
        ),
        (None, None) => None,
        _ => {
            warn!("Both HOME_TEAM and AWAY_TEAM must be set; picking a random fixture");
            None
        }
    }
}

fn team_spec(name: &str, country: Option<&str>) -> TeamSpec {
    let name = name.trim();
    let country = country
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .or_else(|| get_club_config(name).map(|c| c.country.to_string()))
        .unwrap_or_else(|| UNKNOWN_COUNTRY.to_string());
    TeamSpec::new(name, country)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_range_defaults() {
        assert_eq!(parse_count_range("GOALS", None, None, 3..=6), 3..=6);
    }

    #[test]
    fn test_count_range_overrides() {
        assert_eq!(parse_count_range("GOALS", Some("2"), Some("8"), 3..=6), 2..=8);
        assert_eq!(parse_count_range("GOALS", None, Some("4"), 3..=6), 3..=4);
        assert_eq!(parse_count_range("GOALS", Some(" 5 "), None, 3..=6), 5..=6);
    }

    #[test]
    fn test_count_range_rejects_invalid_input() {
        assert_eq!(parse_count_range("GOALS", Some("7"), Some("2"), 3..=6), 3..=6);
        assert_eq!(parse_count_range("GOALS", Some("many"), None, 3..=6), 3..=6);
        assert_eq!(parse_count_range("GOALS", Some("9"), None, 3..=6), 3..=6);
    }

    #[test]
    fn test_fixture_requires_both_teams() {
        assert!(parse_fixture(None, None, None, None).is_none());
        assert!(parse_fixture(Some("Liverpool"), None, None, None).is_none());
        assert!(parse_fixture(Some("Liverpool"), None, Some(" "), None).is_none());
    }

    #[test]
    fn test_fixture_countries() {
        let fixture = parse_fixture(
            Some("Liverpool"),
            None,
            Some("Team B"),
            Some("Team B Country"),
        )
        .unwrap();
        assert_eq!(fixture.home, TeamSpec::new("Liverpool", "England"));
        assert_eq!(fixture.away, TeamSpec::new("Team B", "Team B Country"));

        let fixture = parse_fixture(Some("Team A"), None, Some("Real Madrid"), None).unwrap();
        assert_eq!(fixture.home.country, UNKNOWN_COUNTRY);
        assert_eq!(fixture.away.country, "Spain");
    }
}

//! Club catalog for fixture selection.
//!
//! This module provides:
//! - Static configuration for the clubs the simulator knows about
//! - Case-insensitive lookup by club name
//! - Random selection of a fixture between two distinct clubs

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Static configuration for a single club.
#[derive(Debug, Clone)]
pub struct ClubConfig {
    pub name: &'static str,
    pub country: &'static str,
}

/// Static configuration for all known clubs.
pub static CLUB_CONFIGS: &[ClubConfig] = &[
    // Czech Republic
    ClubConfig {
        name: "AC Sparta",
        country: "Czech Republic",
    },
    ClubConfig {
        name: "SK Slavia",
        country: "Czech Republic",
    },
    // Spain
    ClubConfig {
        name: "FC Barcelona",
        country: "Spain",
    },
    ClubConfig {
        name: "Real Madrid",
        country: "Spain",
    },
    // England
    ClubConfig {
        name: "Manchester United",
        country: "England",
    },
    ClubConfig {
        name: "Liverpool",
        country: "England",
    },
    // Germany
    ClubConfig {
        name: "Bayern Munich",
        country: "Germany",
    },
    ClubConfig {
        name: "Borussia Dortmund",
        country: "Germany",
    },
];

/// Get club configuration by name (case-insensitive).
pub fn get_club_config(name: &str) -> Option<&'static ClubConfig> {
    CLUB_CONFIGS
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(name.trim()))
}

/// A team identified by name, as the provisioner sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSpec {
    pub name: String,
    pub country: String,
}

impl TeamSpec {
    pub fn new(name: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
        }
    }
}

impl From<&ClubConfig> for TeamSpec {
    fn from(config: &ClubConfig) -> Self {
        TeamSpec::new(config.name, config.country)
    }
}

/// Home and away side of one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    pub home: TeamSpec,
    pub away: TeamSpec,
}

impl Fixture {
    pub fn new(home: TeamSpec, away: TeamSpec) -> Self {
        Self { home, away }
    }
}

/// Pick two distinct clubs uniformly at random; the first drawn plays at home.
pub fn pick_fixture<R: Rng + ?Sized>(rng: &mut R) -> Fixture {
    let count = CLUB_CONFIGS.len();
    let home = rng.gen_range(0..count);
    // Draw from the remaining clubs by skipping over the home index.
    let mut away = rng.gen_range(0..count - 1);
    if away >= home {
        away += 1;
    }
    Fixture::new((&CLUB_CONFIGS[home]).into(), (&CLUB_CONFIGS[away]).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_get_club_config() {
        let club = get_club_config("Liverpool").unwrap();
        assert_eq!(club.country, "England");
    }

    #[test]
    fn test_case_insensitivity() {
        assert!(get_club_config("REAL MADRID").is_some());
        assert!(get_club_config("real madrid").is_some());
        assert!(get_club_config(" Real Madrid ").is_some());
    }

    #[test]
    fn test_missing_club() {
        assert!(get_club_config("Nonexistent FC").is_none());
    }

    #[test]
    fn test_all_clubs_count() {
        assert_eq!(CLUB_CONFIGS.len(), 8);
    }

    #[test]
    fn test_pick_fixture_never_pairs_a_club_with_itself() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let fixture = pick_fixture(&mut rng);
            assert_ne!(fixture.home.name, fixture.away.name);
            assert!(get_club_config(&fixture.home.name).is_some());
            assert!(get_club_config(&fixture.away.name).is_some());
        }
    }

    #[test]
    fn test_pick_fixture_reaches_every_club() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            let fixture = pick_fixture(&mut rng);
            seen.insert(fixture.home.name);
            seen.insert(fixture.away.name);
        }
        assert_eq!(seen.len(), CLUB_CONFIGS.len());
    }
}

//! Match simulation
//!
//! This module provides:
//! - Roster provisioning (idempotent team upsert, formation-shaped squads)
//! - Random event generation with an injectable RNG
//! - Score accumulation from goal events
//! - The match lifecycle driver tying them together

pub mod driver;
pub mod events;
pub mod roster;
pub mod score;

pub use driver::{MatchSimulator, SimulationReport};
pub use events::{EventGenerationConfig, EventGenerator, EventPlanner};
pub use roster::{ProvisionedTeams, RosterProvisioner, FORMATION, SQUAD_SIZE};
pub use score::Score;

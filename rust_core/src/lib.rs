//! Matchday Core - football match store and match simulation.
//!
//! This module provides:
//! - Domain models for teams, players, matches and match events
//! - A data access gateway abstraction with PostgreSQL and in-memory stores
//! - A CRUD catalog with not-found / conflict semantics
//! - Random match simulation: roster provisioning, event generation,
//!   score accumulation and the match lifecycle driver

pub mod catalog;
pub mod db;
pub mod error;
pub mod gateway;
pub mod models;
pub mod simulation;
pub mod team_catalog;

pub use catalog::Catalog;
pub use error::{MatchdayError, Result};
pub use gateway::{CatalogStore, DataGateway, MemoryStore};
pub use simulation::{EventGenerationConfig, EventGenerator, MatchSimulator, SimulationReport};
pub use team_catalog::{Fixture, TeamSpec};

//! Match Simulator Library
//!
//! Exposes configuration loading and the single-run simulation entry point
//! so they can be exercised without a database.

pub mod config;
pub mod runner;

pub use config::SimulatorConfig;
pub use runner::{build_rng, render_report, run_simulation};

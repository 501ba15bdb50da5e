//! PostgreSQL persistence for the match store.
//!
//! This module provides:
//! - Connection pool creation driven by environment configuration
//! - A liveness probe used before a simulation run
//! - Idempotent schema bootstrap
//! - `PgStore`, the sqlx-backed implementation of the store traits

pub mod health;
pub mod pool;
pub mod postgres;
pub mod schema;

pub use health::check_pool_health;
pub use pool::{create_pool, DbPoolConfig};
pub use postgres::PgStore;
pub use schema::ensure_schema;

//! Database connection health check

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::debug;

/// Check if database pool is healthy
pub async fn check_pool_health(pool: &PgPool) -> Result<()> {
    sqlx::query("SELECT 1")
        .fetch_one(pool)
        .await
        .context("Database health check failed")?;
    debug!(
        "Database healthy: size={}, idle={}",
        pool.size(),
        pool.num_idle()
    );
    Ok(())
}

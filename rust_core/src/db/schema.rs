//! Schema bootstrap
//!
//! Statements are idempotent so every run can apply them unconditionally.

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS teams (
        id      BIGSERIAL PRIMARY KEY,
        name    TEXT NOT NULL UNIQUE,
        country TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS players (
        id       BIGSERIAL PRIMARY KEY,
        name     TEXT NOT NULL,
        age      INTEGER NOT NULL,
        position TEXT NOT NULL
            CHECK (position IN ('goalkeeper', 'defender', 'midfielder', 'forward')),
        team_id  BIGINT NOT NULL REFERENCES teams (id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS matches (
        id         BIGSERIAL PRIMARY KEY,
        home_team  BIGINT NOT NULL REFERENCES teams (id) ON DELETE CASCADE,
        away_team  BIGINT NOT NULL REFERENCES teams (id) ON DELETE CASCADE,
        match_date TIMESTAMPTZ NOT NULL,
        home_score INTEGER NOT NULL DEFAULT 0 CHECK (home_score >= 0),
        away_score INTEGER NOT NULL DEFAULT 0 CHECK (away_score >= 0),
        status     TEXT NOT NULL DEFAULT 'scheduled'
            CHECK (status IN ('scheduled', 'in_progress', 'finished'))
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS events (
        id         BIGSERIAL PRIMARY KEY,
        match_id   BIGINT NOT NULL REFERENCES matches (id) ON DELETE CASCADE,
        team_id    BIGINT NOT NULL REFERENCES teams (id) ON DELETE CASCADE,
        player_id  BIGINT NOT NULL REFERENCES players (id) ON DELETE CASCADE,
        event_type TEXT NOT NULL CHECK (event_type IN ('goal', 'yellow_card', 'red_card')),
        minute     INTEGER NOT NULL CHECK (minute BETWEEN 1 AND 90)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_players_team ON players (team_id)",
    "CREATE INDEX IF NOT EXISTS idx_events_match ON events (match_id, minute)",
];

/// Create tables and indexes if they do not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .context("Failed to apply schema statement")?;
    }
    info!("Schema ready ({} statements applied)", SCHEMA.len());
    Ok(())
}

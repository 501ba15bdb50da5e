//! sqlx-backed implementation of the store traits
//!
//! Every call is a single parameterized statement awaited to completion;
//! callers sequence them.

use crate::error::{MatchdayError, Result};
use crate::gateway::{CatalogStore, DataGateway};
use crate::models::{
    EventId, Match, MatchId, MatchStatus, MatchUpdate, NewEvent, Player, PlayerDetails,
    PlayerId, PlayerWithTeam, Position, Side, Team, TeamId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;

const MATCH_COLUMNS: &str =
    "id, home_team, away_team, match_date, home_score, away_score, status";

#[derive(sqlx::FromRow)]
struct TeamRow {
    id: i64,
    name: String,
    country: String,
}

impl From<TeamRow> for Team {
    fn from(row: TeamRow) -> Self {
        Team {
            id: row.id,
            name: row.name,
            country: row.country,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PlayerRow {
    id: i64,
    name: String,
    age: i32,
    position: String,
    team_id: i64,
}

impl TryFrom<PlayerRow> for Player {
    type Error = MatchdayError;

    fn try_from(row: PlayerRow) -> Result<Self> {
        Ok(Player {
            id: row.id,
            name: row.name,
            age: row.age,
            position: row.position.parse()?,
            team_id: row.team_id,
        })
    }
}

#[derive(sqlx::FromRow)]
struct MatchRow {
    id: i64,
    home_team: i64,
    away_team: i64,
    match_date: DateTime<Utc>,
    home_score: i32,
    away_score: i32,
    status: String,
}

impl TryFrom<MatchRow> for Match {
    type Error = MatchdayError;

    fn try_from(row: MatchRow) -> Result<Self> {
        Ok(Match {
            id: row.id,
            home_team: row.home_team,
            away_team: row.away_team,
            match_date: row.match_date,
            home_score: row.home_score,
            away_score: row.away_score,
            status: row.status.parse()?,
        })
    }
}

fn into_matches(rows: Vec<MatchRow>) -> Result<Vec<Match>> {
    rows.into_iter().map(Match::try_from).collect()
}

fn into_players(rows: Vec<PlayerRow>) -> Result<Vec<Player>> {
    rows.into_iter().map(Player::try_from).collect()
}

/// Match store backed by a PostgreSQL pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl DataGateway for PgStore {
    async fn upsert_team(&self, name: &str, country: &str) -> Result<TeamId> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO teams (name, country)
            VALUES ($1, $2)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id
            "#,
        )
        .bind(name)
        .bind(country)
        .fetch_one(&self.pool)
        .await?;
        debug!("Upserted team '{}' -> #{}", name, id);
        Ok(id)
    }

    async fn count_players(&self, team_id: TeamId) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM players WHERE team_id = $1")
            .bind(team_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn insert_player(
        &self,
        name: &str,
        age: i32,
        position: Position,
        team_id: TeamId,
    ) -> Result<PlayerId> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO players (name, age, position, team_id) VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(name)
        .bind(age)
        .bind(position.as_str())
        .bind(team_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn create_match(
        &self,
        home_team: TeamId,
        away_team: TeamId,
        match_date: DateTime<Utc>,
        status: MatchStatus,
    ) -> Result<MatchId> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO matches (home_team, away_team, match_date, home_score, away_score, status)
            VALUES ($1, $2, $3, 0, 0, $4)
            RETURNING id
            "#,
        )
        .bind(home_team)
        .bind(away_team)
        .bind(match_date)
        .bind(status.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn list_player_ids(&self, team_id: TeamId) -> Result<Vec<PlayerId>> {
        let ids: Vec<i64> =
            sqlx::query_scalar("SELECT id FROM players WHERE team_id = $1 ORDER BY id")
                .bind(team_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(ids)
    }

    async fn insert_event(&self, event: &NewEvent) -> Result<EventId> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO events (match_id, team_id, player_id, event_type, minute)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(event.match_id)
        .bind(event.team_id)
        .bind(event.player_id)
        .bind(event.event_type.as_str())
        .bind(event.minute)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn increment_score(&self, match_id: MatchId, side: Side) -> Result<()> {
        let statement = match side {
            Side::Home => "UPDATE matches SET home_score = home_score + 1 WHERE id = $1",
            Side::Away => "UPDATE matches SET away_score = away_score + 1 WHERE id = $1",
        };
        let result = sqlx::query(statement)
            .bind(match_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(MatchdayError::not_found("match", match_id));
        }
        Ok(())
    }

    async fn set_match_status(&self, match_id: MatchId, status: MatchStatus) -> Result<()> {
        let result = sqlx::query("UPDATE matches SET status = $2 WHERE id = $1")
            .bind(match_id)
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(MatchdayError::not_found("match", match_id));
        }
        Ok(())
    }

    async fn get_match(&self, match_id: MatchId) -> Result<Match> {
        self.find_match(match_id)
            .await?
            .ok_or_else(|| MatchdayError::not_found("match", match_id))
    }
}

#[async_trait]
impl CatalogStore for PgStore {
    async fn find_team(&self, team_id: TeamId) -> Result<Option<Team>> {
        let row: Option<TeamRow> =
            sqlx::query_as("SELECT id, name, country FROM teams WHERE id = $1")
                .bind(team_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Team::from))
    }

    async fn find_team_by_name(&self, name: &str) -> Result<Option<Team>> {
        let row: Option<TeamRow> =
            sqlx::query_as("SELECT id, name, country FROM teams WHERE name = $1")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Team::from))
    }

    async fn insert_team(&self, name: &str, country: &str) -> Result<Team> {
        let row: TeamRow = sqlx::query_as(
            "INSERT INTO teams (name, country) VALUES ($1, $2) RETURNING id, name, country",
        )
        .bind(name)
        .bind(country)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn list_teams(&self) -> Result<Vec<Team>> {
        let rows: Vec<TeamRow> = sqlx::query_as("SELECT id, name, country FROM teams ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Team::from).collect())
    }

    async fn update_team(&self, team_id: TeamId, name: &str, country: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE teams SET name = $2, country = $3 WHERE id = $1")
            .bind(team_id)
            .bind(name)
            .bind(country)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_team(&self, team_id: TeamId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(team_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_player(&self, player_id: PlayerId) -> Result<Option<Player>> {
        let row: Option<PlayerRow> = sqlx::query_as(
            "SELECT id, name, age, position, team_id FROM players WHERE id = $1",
        )
        .bind(player_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Player::try_from).transpose()
    }

    async fn find_player_with_team(&self, player_id: PlayerId) -> Result<Option<PlayerWithTeam>> {
        let row: Option<(String, String)> = sqlx::query_as(
            r#"
            SELECT players.name, teams.name
            FROM players
            JOIN teams ON players.team_id = teams.id
            WHERE players.id = $1
            "#,
        )
        .bind(player_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|(player_name, team_name)| PlayerWithTeam {
            player_name,
            team_name,
        }))
    }

    async fn add_player(&self, team_id: TeamId, details: &PlayerDetails) -> Result<Player> {
        let row: PlayerRow = sqlx::query_as(
            r#"
            INSERT INTO players (name, age, position, team_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, age, position, team_id
            "#,
        )
        .bind(&details.name)
        .bind(details.age)
        .bind(details.position.as_str())
        .bind(team_id)
        .fetch_one(&self.pool)
        .await?;
        row.try_into()
    }

    async fn list_players(&self, team_id: TeamId) -> Result<Vec<Player>> {
        let rows: Vec<PlayerRow> = sqlx::query_as(
            "SELECT id, name, age, position, team_id FROM players WHERE team_id = $1 ORDER BY id",
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?;
        into_players(rows)
    }

    async fn update_player(&self, player_id: PlayerId, details: &PlayerDetails) -> Result<bool> {
        let result =
            sqlx::query("UPDATE players SET name = $2, age = $3, position = $4 WHERE id = $1")
                .bind(player_id)
                .bind(&details.name)
                .bind(details.age)
                .bind(details.position.as_str())
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_player(&self, player_id: PlayerId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM players WHERE id = $1")
            .bind(player_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_match(&self, match_id: MatchId) -> Result<Option<Match>> {
        let row: Option<MatchRow> =
            sqlx::query_as(&format!("SELECT {} FROM matches WHERE id = $1", MATCH_COLUMNS))
                .bind(match_id)
                .fetch_optional(&self.pool)
                .await?;
        row.map(Match::try_from).transpose()
    }

    async fn list_matches(&self) -> Result<Vec<Match>> {
        let rows: Vec<MatchRow> =
            sqlx::query_as(&format!("SELECT {} FROM matches ORDER BY id", MATCH_COLUMNS))
                .fetch_all(&self.pool)
                .await?;
        into_matches(rows)
    }

    async fn list_matches_for_team(&self, team_id: TeamId) -> Result<Vec<Match>> {
        let rows: Vec<MatchRow> = sqlx::query_as(&format!(
            "SELECT {} FROM matches WHERE home_team = $1 OR away_team = $1 ORDER BY id",
            MATCH_COLUMNS
        ))
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?;
        into_matches(rows)
    }

    async fn insert_match(
        &self,
        home_team: TeamId,
        away_team: TeamId,
        match_date: DateTime<Utc>,
    ) -> Result<Match> {
        let row: MatchRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO matches (home_team, away_team, match_date, home_score, away_score, status)
            VALUES ($1, $2, $3, 0, 0, 'scheduled')
            RETURNING {}
            "#,
            MATCH_COLUMNS
        ))
        .bind(home_team)
        .bind(away_team)
        .bind(match_date)
        .fetch_one(&self.pool)
        .await?;
        row.try_into()
    }

    async fn update_match(&self, match_id: MatchId, update: &MatchUpdate) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE matches
            SET home_team = $2, away_team = $3, match_date = $4,
                home_score = $5, away_score = $6, status = $7
            WHERE id = $1
            "#,
        )
        .bind(match_id)
        .bind(update.home_team)
        .bind(update.away_team)
        .bind(update.match_date)
        .bind(update.home_score)
        .bind(update.away_score)
        .bind(update.status.as_str())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_match(&self, match_id: MatchId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM matches WHERE id = $1")
            .bind(match_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_row_conversion() {
        let row = MatchRow {
            id: 3,
            home_team: 1,
            away_team: 2,
            match_date: Utc::now(),
            home_score: 2,
            away_score: 1,
            status: "finished".to_string(),
        };
        let m = Match::try_from(row).unwrap();
        assert_eq!(m.status, MatchStatus::Finished);
        assert_eq!((m.home_score, m.away_score), (2, 1));
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let row = MatchRow {
            id: 3,
            home_team: 1,
            away_team: 2,
            match_date: Utc::now(),
            home_score: 0,
            away_score: 0,
            status: "postponed".to_string(),
        };
        assert!(Match::try_from(row).unwrap_err().is_validation());
    }

    #[test]
    fn test_player_row_conversion() {
        let row = PlayerRow {
            id: 10,
            name: "Robin Davis".to_string(),
            age: 27,
            position: "midfielder".to_string(),
            team_id: 1,
        };
        let player = Player::try_from(row).unwrap();
        assert_eq!(player.position, Position::Midfielder);
    }
}

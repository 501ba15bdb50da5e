//! In-process implementation of the store traits.
//!
//! Mirrors the PostgreSQL schema semantics (unique team names, cascading
//! deletes, sequential ids) so the simulator can run without a database.
//! Failures can be injected per operation to exercise abort paths.

use super::{CatalogStore, DataGateway};
use crate::error::{MatchdayError, Result};
use crate::models::{
    EventId, Match, MatchEvent, MatchId, MatchStatus, MatchUpdate, NewEvent, Player,
    PlayerDetails, PlayerId, PlayerWithTeam, Position, Side, Team, TeamId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;

#[derive(Debug, Default)]
struct Tables {
    teams: Vec<Team>,
    players: Vec<Player>,
    matches: Vec<Match>,
    events: Vec<MatchEvent>,
    next_id: i64,
    /// operation name -> successful calls left before it starts failing
    failures: HashMap<&'static str, usize>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn check(&mut self, op: &'static str) -> Result<()> {
        if let Some(remaining) = self.failures.get_mut(op) {
            if *remaining == 0 {
                return Err(MatchdayError::Persistence(sqlx::Error::Protocol(format!(
                    "injected failure in {}",
                    op
                ))));
            }
            *remaining -= 1;
        }
        Ok(())
    }

    fn match_mut(&mut self, match_id: MatchId) -> Result<&mut Match> {
        self.matches
            .iter_mut()
            .find(|m| m.id == match_id)
            .ok_or_else(|| MatchdayError::not_found("match", match_id))
    }

    fn has_team(&self, team_id: TeamId) -> bool {
        self.teams.iter().any(|t| t.id == team_id)
    }

    fn remove_match_rows(&mut self, match_ids: &[MatchId]) {
        self.matches.retain(|m| !match_ids.contains(&m.id));
        self.events.retain(|e| !match_ids.contains(&e.match_id));
    }
}

/// Thread-safe in-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Let `op` succeed `after` more times, then fail every following call
    /// with a persistence error. `op` is the trait method name.
    pub fn inject_failure(&self, op: &'static str, after: usize) {
        self.tables.lock().failures.insert(op, after);
    }

    pub fn clear_failures(&self) {
        self.tables.lock().failures.clear();
    }

    pub fn teams_named(&self, name: &str) -> usize {
        self.tables.lock().teams.iter().filter(|t| t.name == name).count()
    }

    pub fn team_count(&self) -> usize {
        self.tables.lock().teams.len()
    }

    pub fn match_count(&self) -> usize {
        self.tables.lock().matches.len()
    }

    pub fn players_of(&self, team_id: TeamId) -> Vec<Player> {
        self.tables
            .lock()
            .players
            .iter()
            .filter(|p| p.team_id == team_id)
            .cloned()
            .collect()
    }

    /// Persisted events of a match in insertion order.
    pub fn events_of(&self, match_id: MatchId) -> Vec<MatchEvent> {
        self.tables
            .lock()
            .events
            .iter()
            .filter(|e| e.match_id == match_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl DataGateway for MemoryStore {
    async fn upsert_team(&self, name: &str, country: &str) -> Result<TeamId> {
        let mut tables = self.tables.lock();
        tables.check("upsert_team")?;
        if let Some(team) = tables.teams.iter().find(|t| t.name == name) {
            return Ok(team.id);
        }
        let id = tables.next_id();
        tables.teams.push(Team {
            id,
            name: name.to_string(),
            country: country.to_string(),
        });
        Ok(id)
    }

    async fn count_players(&self, team_id: TeamId) -> Result<i64> {
        let mut tables = self.tables.lock();
        tables.check("count_players")?;
        Ok(tables.players.iter().filter(|p| p.team_id == team_id).count() as i64)
    }

    async fn insert_player(
        &self,
        name: &str,
        age: i32,
        position: Position,
        team_id: TeamId,
    ) -> Result<PlayerId> {
        let player = self
            .add_player(
                team_id,
                &PlayerDetails {
                    name: name.to_string(),
                    age,
                    position,
                },
            )
            .await?;
        Ok(player.id)
    }

    async fn create_match(
        &self,
        home_team: TeamId,
        away_team: TeamId,
        match_date: DateTime<Utc>,
        status: MatchStatus,
    ) -> Result<MatchId> {
        let mut tables = self.tables.lock();
        tables.check("create_match")?;
        if !tables.has_team(home_team) || !tables.has_team(away_team) {
            return Err(MatchdayError::Persistence(sqlx::Error::Protocol(
                "foreign key violation on matches team reference".to_string(),
            )));
        }
        let id = tables.next_id();
        tables.matches.push(Match {
            id,
            home_team,
            away_team,
            match_date,
            home_score: 0,
            away_score: 0,
            status,
        });
        Ok(id)
    }

    async fn list_player_ids(&self, team_id: TeamId) -> Result<Vec<PlayerId>> {
        let mut tables = self.tables.lock();
        tables.check("list_player_ids")?;
        Ok(tables
            .players
            .iter()
            .filter(|p| p.team_id == team_id)
            .map(|p| p.id)
            .collect())
    }

    async fn insert_event(&self, event: &NewEvent) -> Result<EventId> {
        let mut tables = self.tables.lock();
        tables.check("insert_event")?;
        tables.match_mut(event.match_id)?;
        let id = tables.next_id();
        tables.events.push(MatchEvent::from_new(id, event));
        Ok(id)
    }

    async fn increment_score(&self, match_id: MatchId, side: Side) -> Result<()> {
        let mut tables = self.tables.lock();
        tables.check("increment_score")?;
        let m = tables.match_mut(match_id)?;
        match side {
            Side::Home => m.home_score += 1,
            Side::Away => m.away_score += 1,
        }
        Ok(())
    }

    async fn set_match_status(&self, match_id: MatchId, status: MatchStatus) -> Result<()> {
        let mut tables = self.tables.lock();
        tables.check("set_match_status")?;
        tables.match_mut(match_id)?.status = status;
        Ok(())
    }

    async fn get_match(&self, match_id: MatchId) -> Result<Match> {
        let mut tables = self.tables.lock();
        tables.check("get_match")?;
        tables.match_mut(match_id).map(|m| m.clone())
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn find_team(&self, team_id: TeamId) -> Result<Option<Team>> {
        let tables = self.tables.lock();
        Ok(tables.teams.iter().find(|t| t.id == team_id).cloned())
    }

    async fn find_team_by_name(&self, name: &str) -> Result<Option<Team>> {
        let tables = self.tables.lock();
        Ok(tables.teams.iter().find(|t| t.name == name).cloned())
    }

    async fn insert_team(&self, name: &str, country: &str) -> Result<Team> {
        let mut tables = self.tables.lock();
        tables.check("insert_team")?;
        if tables.teams.iter().any(|t| t.name == name) {
            return Err(MatchdayError::Persistence(sqlx::Error::Protocol(format!(
                "duplicate key value violates unique constraint on teams.name ({})",
                name
            ))));
        }
        let team = Team {
            id: tables.next_id(),
            name: name.to_string(),
            country: country.to_string(),
        };
        tables.teams.push(team.clone());
        Ok(team)
    }

    async fn list_teams(&self) -> Result<Vec<Team>> {
        Ok(self.tables.lock().teams.clone())
    }

    async fn update_team(&self, team_id: TeamId, name: &str, country: &str) -> Result<bool> {
        let mut tables = self.tables.lock();
        tables.check("update_team")?;
        if tables.teams.iter().any(|t| t.name == name && t.id != team_id) {
            return Err(MatchdayError::Persistence(sqlx::Error::Protocol(format!(
                "duplicate key value violates unique constraint on teams.name ({})",
                name
            ))));
        }
        match tables.teams.iter_mut().find(|t| t.id == team_id) {
            Some(team) => {
                team.name = name.to_string();
                team.country = country.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_team(&self, team_id: TeamId) -> Result<bool> {
        let mut tables = self.tables.lock();
        tables.check("delete_team")?;
        if !tables.has_team(team_id) {
            return Ok(false);
        }
        let match_ids: Vec<MatchId> = tables
            .matches
            .iter()
            .filter(|m| m.home_team == team_id || m.away_team == team_id)
            .map(|m| m.id)
            .collect();
        tables.remove_match_rows(&match_ids);
        tables.events.retain(|e| e.team_id != team_id);
        tables.players.retain(|p| p.team_id != team_id);
        tables.teams.retain(|t| t.id != team_id);
        Ok(true)
    }

    async fn find_player(&self, player_id: PlayerId) -> Result<Option<Player>> {
        let tables = self.tables.lock();
        Ok(tables.players.iter().find(|p| p.id == player_id).cloned())
    }

    async fn find_player_with_team(&self, player_id: PlayerId) -> Result<Option<PlayerWithTeam>> {
        let tables = self.tables.lock();
        let joined = tables.players.iter().find(|p| p.id == player_id).and_then(|p| {
            tables
                .teams
                .iter()
                .find(|t| t.id == p.team_id)
                .map(|t| PlayerWithTeam {
                    player_name: p.name.clone(),
                    team_name: t.name.clone(),
                })
        });
        Ok(joined)
    }

    async fn add_player(&self, team_id: TeamId, details: &PlayerDetails) -> Result<Player> {
        let mut tables = self.tables.lock();
        tables.check("insert_player")?;
        if !tables.has_team(team_id) {
            return Err(MatchdayError::Persistence(sqlx::Error::Protocol(
                "foreign key violation on players.team_id".to_string(),
            )));
        }
        let player = Player {
            id: tables.next_id(),
            name: details.name.clone(),
            age: details.age,
            position: details.position,
            team_id,
        };
        tables.players.push(player.clone());
        Ok(player)
    }

    async fn list_players(&self, team_id: TeamId) -> Result<Vec<Player>> {
        Ok(self.players_of(team_id))
    }

    async fn update_player(&self, player_id: PlayerId, details: &PlayerDetails) -> Result<bool> {
        let mut tables = self.tables.lock();
        tables.check("update_player")?;
        match tables.players.iter_mut().find(|p| p.id == player_id) {
            Some(player) => {
                player.name = details.name.clone();
                player.age = details.age;
                player.position = details.position;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_player(&self, player_id: PlayerId) -> Result<bool> {
        let mut tables = self.tables.lock();
        tables.check("delete_player")?;
        let before = tables.players.len();
        tables.players.retain(|p| p.id != player_id);
        if tables.players.len() == before {
            return Ok(false);
        }
        tables.events.retain(|e| e.player_id != player_id);
        Ok(true)
    }

    async fn find_match(&self, match_id: MatchId) -> Result<Option<Match>> {
        let tables = self.tables.lock();
        Ok(tables.matches.iter().find(|m| m.id == match_id).cloned())
    }

    async fn list_matches(&self) -> Result<Vec<Match>> {
        Ok(self.tables.lock().matches.clone())
    }

    async fn list_matches_for_team(&self, team_id: TeamId) -> Result<Vec<Match>> {
        let tables = self.tables.lock();
        Ok(tables
            .matches
            .iter()
            .filter(|m| m.home_team == team_id || m.away_team == team_id)
            .cloned()
            .collect())
    }

    async fn insert_match(
        &self,
        home_team: TeamId,
        away_team: TeamId,
        match_date: DateTime<Utc>,
    ) -> Result<Match> {
        let id = self
            .create_match(home_team, away_team, match_date, MatchStatus::Scheduled)
            .await?;
        self.get_match(id).await
    }

    async fn update_match(&self, match_id: MatchId, update: &MatchUpdate) -> Result<bool> {
        let mut tables = self.tables.lock();
        tables.check("update_match")?;
        if !tables.has_team(update.home_team) || !tables.has_team(update.away_team) {
            return Err(MatchdayError::Persistence(sqlx::Error::Protocol(
                "foreign key violation on matches team reference".to_string(),
            )));
        }
        match tables.matches.iter_mut().find(|m| m.id == match_id) {
            Some(m) => {
                m.home_team = update.home_team;
                m.away_team = update.away_team;
                m.match_date = update.match_date;
                m.home_score = update.home_score;
                m.away_score = update.away_score;
                m.status = update.status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_match(&self, match_id: MatchId) -> Result<bool> {
        let mut tables = self.tables.lock();
        tables.check("delete_match")?;
        if !tables.matches.iter().any(|m| m.id == match_id) {
            return Ok(false);
        }
        tables.remove_match_rows(&[match_id]);
        Ok(true)
    }
}

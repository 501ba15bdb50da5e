//! Team, player and match catalog.
//!
//! CRUD operations on top of a `CatalogStore`, reporting missing rows as
//! `NotFound` and conflicting input as `Validation`. Listing operations
//! treat an empty result as `NotFound`.

use crate::error::{MatchdayError, Result};
use crate::gateway::CatalogStore;
use crate::models::{
    Match, MatchId, MatchUpdate, Player, PlayerDetails, PlayerId, PlayerWithTeam, Team, TeamId,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;

pub struct Catalog {
    store: Arc<dyn CatalogStore>,
}

impl Catalog {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    // ------------------------------------------------------------------
    // Teams
    // ------------------------------------------------------------------

    pub async fn create_team(&self, name: &str, country: &str) -> Result<Team> {
        let name = name.trim();
        if name.is_empty() {
            return Err(MatchdayError::validation("team name must not be empty"));
        }
        if self.store.find_team_by_name(name).await?.is_some() {
            return Err(MatchdayError::validation(format!("team '{}' already exists", name)));
        }
        let team = self.store.insert_team(name, country).await?;
        info!("Created team #{} '{}'", team.id, team.name);
        Ok(team)
    }

    pub async fn list_teams(&self) -> Result<Vec<Team>> {
        non_empty(self.store.list_teams().await?, "teams", "any")
    }

    pub async fn update_team(&self, team_id: TeamId, name: &str, country: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(MatchdayError::validation("team name must not be empty"));
        }
        self.require_team(team_id).await?;
        if let Some(other) = self.store.find_team_by_name(name).await? {
            if other.id != team_id {
                return Err(MatchdayError::validation(format!("team '{}' already exists", name)));
            }
        }
        found(self.store.update_team(team_id, name, country).await?, "team", team_id)
    }

    pub async fn delete_team(&self, team_id: TeamId) -> Result<()> {
        found(self.store.delete_team(team_id).await?, "team", team_id)
    }

    pub async fn team_matches(&self, team_id: TeamId) -> Result<Vec<Match>> {
        non_empty(
            self.store.list_matches_for_team(team_id).await?,
            "matches for team",
            team_id,
        )
    }

    // ------------------------------------------------------------------
    // Players
    // ------------------------------------------------------------------

    pub async fn player_with_team(&self, player_id: PlayerId) -> Result<PlayerWithTeam> {
        self.store
            .find_player_with_team(player_id)
            .await?
            .ok_or_else(|| MatchdayError::not_found("player", player_id))
    }

    pub async fn add_player(&self, team_id: TeamId, details: &PlayerDetails) -> Result<Player> {
        validate_player(details)?;
        self.require_team(team_id).await?;
        self.store.add_player(team_id, details).await
    }

    pub async fn team_players(&self, team_id: TeamId) -> Result<Vec<Player>> {
        non_empty(self.store.list_players(team_id).await?, "players for team", team_id)
    }

    pub async fn update_player(&self, player_id: PlayerId, details: &PlayerDetails) -> Result<()> {
        validate_player(details)?;
        found(self.store.update_player(player_id, details).await?, "player", player_id)
    }

    pub async fn delete_player(&self, player_id: PlayerId) -> Result<()> {
        found(self.store.delete_player(player_id).await?, "player", player_id)
    }

    // ------------------------------------------------------------------
    // Matches
    // ------------------------------------------------------------------

    pub async fn list_matches(&self) -> Result<Vec<Match>> {
        non_empty(self.store.list_matches().await?, "matches", "any")
    }

    /// New matches start `scheduled` at 0-0.
    pub async fn create_match(
        &self,
        home_team: TeamId,
        away_team: TeamId,
        match_date: DateTime<Utc>,
    ) -> Result<Match> {
        if home_team == away_team {
            return Err(MatchdayError::validation("a team cannot play itself"));
        }
        for team_id in [home_team, away_team] {
            self.require_team(team_id).await?;
        }
        let created = self.store.insert_match(home_team, away_team, match_date).await?;
        info!(
            "Scheduled match #{}: team #{} vs team #{}",
            created.id, home_team, away_team
        );
        Ok(created)
    }

    pub async fn update_match(&self, match_id: MatchId, update: &MatchUpdate) -> Result<()> {
        update.validate()?;
        found(self.store.update_match(match_id, update).await?, "match", match_id)
    }

    pub async fn delete_match(&self, match_id: MatchId) -> Result<()> {
        found(self.store.delete_match(match_id).await?, "match", match_id)
    }

    async fn require_team(&self, team_id: TeamId) -> Result<Team> {
        self.store
            .find_team(team_id)
            .await?
            .ok_or_else(|| MatchdayError::not_found("team", team_id))
    }
}

fn validate_player(details: &PlayerDetails) -> Result<()> {
    if details.name.trim().is_empty() {
        return Err(MatchdayError::validation("player name must not be empty"));
    }
    if details.age <= 0 {
        return Err(MatchdayError::validation(format!("invalid player age {}", details.age)));
    }
    Ok(())
}

fn found(affected: bool, entity: &'static str, key: impl ToString) -> Result<()> {
    if affected {
        Ok(())
    } else {
        Err(MatchdayError::not_found(entity, key))
    }
}

fn non_empty<T>(rows: Vec<T>, entity: &'static str, key: impl ToString) -> Result<Vec<T>> {
    if rows.is_empty() {
        Err(MatchdayError::not_found(entity, key))
    } else {
        Ok(rows)
    }
}

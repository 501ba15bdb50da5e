//! Data access abstractions for the match store
//!
//! Two traits split the store surface:
//! - `DataGateway`: the narrow set of operations the simulator needs
//! - `CatalogStore`: primitive CRUD reads/writes used by the catalog service
//!
//! Both are implemented by `db::PgStore` (PostgreSQL) and `MemoryStore`.

use crate::error::Result;
use crate::models::{
    EventId, Match, MatchId, MatchStatus, MatchUpdate, NewEvent, Player, PlayerDetails,
    PlayerId, PlayerWithTeam, Position, Side, Team, TeamId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub mod memory;

pub use memory::MemoryStore;

/// Store operations consumed by the match simulation.
#[async_trait]
pub trait DataGateway: Send + Sync {
    /// Create the team if its name is unknown; return the id either way.
    async fn upsert_team(&self, name: &str, country: &str) -> Result<TeamId>;

    async fn count_players(&self, team_id: TeamId) -> Result<i64>;

    async fn insert_player(
        &self,
        name: &str,
        age: i32,
        position: Position,
        team_id: TeamId,
    ) -> Result<PlayerId>;

    async fn create_match(
        &self,
        home_team: TeamId,
        away_team: TeamId,
        match_date: DateTime<Utc>,
        status: MatchStatus,
    ) -> Result<MatchId>;

    /// Player ids of a team, in insertion order.
    async fn list_player_ids(&self, team_id: TeamId) -> Result<Vec<PlayerId>>;

    async fn insert_event(&self, event: &NewEvent) -> Result<EventId>;

    async fn increment_score(&self, match_id: MatchId, side: Side) -> Result<()>;

    async fn set_match_status(&self, match_id: MatchId, status: MatchStatus) -> Result<()>;

    /// Fails with `NotFound` when the match does not exist.
    async fn get_match(&self, match_id: MatchId) -> Result<Match>;
}

/// Primitive CRUD operations behind the catalog service.
///
/// Mutations return whether a row was affected; absence is not an error at
/// this level; the catalog decides how to report it.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn find_team(&self, team_id: TeamId) -> Result<Option<Team>>;
    async fn find_team_by_name(&self, name: &str) -> Result<Option<Team>>;
    async fn insert_team(&self, name: &str, country: &str) -> Result<Team>;
    async fn list_teams(&self) -> Result<Vec<Team>>;
    async fn update_team(&self, team_id: TeamId, name: &str, country: &str) -> Result<bool>;
    async fn delete_team(&self, team_id: TeamId) -> Result<bool>;

    async fn find_player(&self, player_id: PlayerId) -> Result<Option<Player>>;
    async fn find_player_with_team(&self, player_id: PlayerId) -> Result<Option<PlayerWithTeam>>;
    async fn add_player(&self, team_id: TeamId, details: &PlayerDetails) -> Result<Player>;
    async fn list_players(&self, team_id: TeamId) -> Result<Vec<Player>>;
    async fn update_player(&self, player_id: PlayerId, details: &PlayerDetails) -> Result<bool>;
    async fn delete_player(&self, player_id: PlayerId) -> Result<bool>;

    async fn find_match(&self, match_id: MatchId) -> Result<Option<Match>>;
    async fn list_matches(&self) -> Result<Vec<Match>>;
    async fn list_matches_for_team(&self, team_id: TeamId) -> Result<Vec<Match>>;
    async fn insert_match(
        &self,
        home_team: TeamId,
        away_team: TeamId,
        match_date: DateTime<Utc>,
    ) -> Result<Match>;
    async fn update_match(&self, match_id: MatchId, update: &MatchUpdate) -> Result<bool>;
    async fn delete_match(&self, match_id: MatchId) -> Result<bool>;
}

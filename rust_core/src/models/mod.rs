// Shared models for the Matchday store and simulator
use crate::error::MatchdayError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type TeamId = i64;
pub type PlayerId = i64;
pub type MatchId = i64;
pub type EventId = i64;

// ============================================================================
// Teams & Players
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub country: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
}

impl Position {
    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Goalkeeper => "goalkeeper",
            Position::Defender => "defender",
            Position::Midfielder => "midfielder",
            Position::Forward => "forward",
        }
    }
}

impl FromStr for Position {
    type Err = MatchdayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "goalkeeper" => Ok(Position::Goalkeeper),
            "defender" => Ok(Position::Defender),
            "midfielder" => Ok(Position::Midfielder),
            "forward" => Ok(Position::Forward),
            other => Err(MatchdayError::validation(format!("unknown position '{}'", other))),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub age: i32,
    pub position: Position,
    pub team_id: TeamId,
}

/// Player fields supplied on create/update (no identity yet).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerDetails {
    pub name: String,
    pub age: i32,
    pub position: Position,
}

/// Player name joined with the owning team's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerWithTeam {
    pub player_name: String,
    pub team_name: String,
}

/// A team's player ids as currently stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamRoster {
    pub team_id: TeamId,
    pub player_ids: Vec<PlayerId>,
}

impl TeamRoster {
    pub fn new(team_id: TeamId, player_ids: Vec<PlayerId>) -> Self {
        Self {
            team_id,
            player_ids,
        }
    }

    pub fn contains(&self, player_id: PlayerId) -> bool {
        self.player_ids.contains(&player_id)
    }

    pub fn is_empty(&self) -> bool {
        self.player_ids.is_empty()
    }
}

// ============================================================================
// Matches
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Scheduled,
    InProgress,
    Finished,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Scheduled => "scheduled",
            MatchStatus::InProgress => "in_progress",
            MatchStatus::Finished => "finished",
        }
    }

    fn rank(&self) -> u8 {
        match self {
            MatchStatus::Scheduled => 0,
            MatchStatus::InProgress => 1,
            MatchStatus::Finished => 2,
        }
    }

    /// Status moves one step at a time: scheduled -> in_progress -> finished.
    pub fn can_transition_to(&self, next: MatchStatus) -> bool {
        next.rank() == self.rank() + 1
    }

    pub fn transition_to(self, next: MatchStatus) -> Result<MatchStatus, MatchdayError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(MatchdayError::validation(format!(
                "illegal match status transition {} -> {}",
                self, next
            )))
        }
    }
}

impl FromStr for MatchStatus {
    type Err = MatchdayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(MatchStatus::Scheduled),
            "in_progress" => Ok(MatchStatus::InProgress),
            "finished" => Ok(MatchStatus::Finished),
            other => Err(MatchdayError::validation(format!("unknown match status '{}'", other))),
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub home_team: TeamId,
    pub away_team: TeamId,
    pub match_date: DateTime<Utc>,
    pub home_score: i32,
    pub away_score: i32,
    pub status: MatchStatus,
}

/// Full replacement of a match's mutable fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchUpdate {
    pub home_team: TeamId,
    pub away_team: TeamId,
    pub match_date: DateTime<Utc>,
    pub home_score: i32,
    pub away_score: i32,
    pub status: MatchStatus,
}

impl MatchUpdate {
    pub fn validate(&self) -> Result<(), MatchdayError> {
        if self.home_team == self.away_team {
            return Err(MatchdayError::validation("a team cannot play itself"));
        }
        if self.home_score < 0 || self.away_score < 0 {
            return Err(MatchdayError::validation("scores must be non-negative"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Home,
    Away,
}

// ============================================================================
// Match Events
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Goal,
    YellowCard,
    RedCard,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Goal => "goal",
            EventType::YellowCard => "yellow_card",
            EventType::RedCard => "red_card",
        }
    }

    pub fn is_goal(&self) -> bool {
        matches!(self, EventType::Goal)
    }
}

impl FromStr for EventType {
    type Err = MatchdayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "goal" => Ok(EventType::Goal),
            "yellow_card" => Ok(EventType::YellowCard),
            "red_card" => Ok(EventType::RedCard),
            other => Err(MatchdayError::validation(format!("unknown event type '{}'", other))),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A generated event that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
    pub match_id: MatchId,
    pub team_id: TeamId,
    pub player_id: PlayerId,
    pub event_type: EventType,
    pub minute: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchEvent {
    pub id: EventId,
    pub match_id: MatchId,
    pub team_id: TeamId,
    pub player_id: PlayerId,
    pub event_type: EventType,
    pub minute: i32,
}

impl MatchEvent {
    pub fn from_new(id: EventId, event: &NewEvent) -> Self {
        Self {
            id,
            match_id: event.match_id,
            team_id: event.team_id,
            player_id: event.player_id,
            event_type: event.event_type,
            minute: event.minute,
        }
    }
}

//! Running score derived from goal events.

use crate::models::{NewEvent, Side, TeamId};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub home: i32,
    pub away: i32,
}

impl Score {
    pub fn new(home: i32, away: i32) -> Self {
        Self { home, away }
    }

    /// Side credited with `event`, or `None` when it is not a goal.
    pub fn scoring_side(home_team: TeamId, event: &NewEvent) -> Option<Side> {
        if !event.event_type.is_goal() {
            return None;
        }
        if event.team_id == home_team {
            Some(Side::Home)
        } else {
            Some(Side::Away)
        }
    }

    /// Score after `event`; non-goal events leave it unchanged.
    #[must_use]
    pub fn apply(self, home_team: TeamId, event: &NewEvent) -> Score {
        match Self::scoring_side(home_team, event) {
            Some(Side::Home) => Score::new(self.home + 1, self.away),
            Some(Side::Away) => Score::new(self.home, self.away + 1),
            None => self,
        }
    }

    /// Fold a whole event sequence from 0-0.
    pub fn tally<'a>(home_team: TeamId, events: impl IntoIterator<Item = &'a NewEvent>) -> Score {
        events
            .into_iter()
            .fold(Score::default(), |score, event| score.apply(home_team, event))
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.home, self.away)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventType;

    fn event(team_id: TeamId, event_type: EventType, minute: i32) -> NewEvent {
        NewEvent {
            match_id: 1,
            team_id,
            player_id: team_id * 100,
            event_type,
            minute,
        }
    }

    #[test]
    fn test_goal_increments_the_right_side() {
        let score = Score::default()
            .apply(1, &event(1, EventType::Goal, 10))
            .apply(1, &event(2, EventType::Goal, 20));
        assert_eq!(score, Score::new(1, 1));
    }

    #[test]
    fn test_cards_pass_through() {
        let score = Score::new(2, 0);
        assert_eq!(score.apply(1, &event(1, EventType::YellowCard, 30)), score);
        assert_eq!(score.apply(1, &event(2, EventType::RedCard, 60)), score);
        assert_eq!(Score::scoring_side(1, &event(1, EventType::RedCard, 60)), None);
    }

    #[test]
    fn test_tally_matches_goal_counts() {
        let events = vec![
            event(1, EventType::Goal, 5),
            event(2, EventType::YellowCard, 12),
            event(1, EventType::Goal, 33),
            event(2, EventType::Goal, 47),
            event(2, EventType::RedCard, 70),
        ];
        let score = Score::tally(1, &events);
        assert_eq!(score, Score::new(2, 1));
        assert_eq!(score.to_string(), "2 - 1");
    }
}

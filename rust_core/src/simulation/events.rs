//! Random match event generation
//!
//! Goals, yellow cards and red cards are drawn independently and then
//! merged into one sequence ordered by minute. Persistence and score
//! accumulation both rely on that order.

use crate::error::{MatchdayError, Result};
use crate::models::{EventType, MatchId, NewEvent, TeamRoster};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use std::ops::RangeInclusive;

/// Minutes a goal or yellow card can happen in.
pub const MATCH_MINUTES: RangeInclusive<i32> = 1..=90;

/// Red cards are only handed out from the 20th minute on.
pub const RED_CARD_MINUTES: RangeInclusive<i32> = 20..=90;

pub const DEFAULT_GOALS: RangeInclusive<u32> = 3..=6;
pub const DEFAULT_YELLOW_CARDS: RangeInclusive<u32> = 1..=4;
pub const DEFAULT_RED_CARDS: RangeInclusive<u32> = 1..=2;

/// How many events of each kind a match gets (inclusive ranges).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventGenerationConfig {
    pub goals: RangeInclusive<u32>,
    pub yellow_cards: RangeInclusive<u32>,
    pub red_cards: RangeInclusive<u32>,
}

impl Default for EventGenerationConfig {
    fn default() -> Self {
        Self {
            goals: DEFAULT_GOALS,
            yellow_cards: DEFAULT_YELLOW_CARDS,
            red_cards: DEFAULT_RED_CARDS,
        }
    }
}

impl EventGenerationConfig {
    /// Fixed counts, mostly useful for scripted runs.
    pub fn exact(goals: u32, yellow_cards: u32, red_cards: u32) -> Self {
        Self {
            goals: goals..=goals,
            yellow_cards: yellow_cards..=yellow_cards,
            red_cards: red_cards..=red_cards,
        }
    }

    pub fn minute_range(event_type: EventType) -> RangeInclusive<i32> {
        match event_type {
            EventType::Goal | EventType::YellowCard => MATCH_MINUTES,
            EventType::RedCard => RED_CARD_MINUTES,
        }
    }

    /// Every count range must be non-empty.
    pub fn validate(&self) -> Result<()> {
        for event_type in [EventType::Goal, EventType::YellowCard, EventType::RedCard] {
            let range = self.count_range(event_type);
            if range.is_empty() {
                return Err(MatchdayError::validation(format!(
                    "empty {} count range {}..={}",
                    event_type,
                    range.start(),
                    range.end()
                )));
            }
        }
        Ok(())
    }

    fn count_range(&self, event_type: EventType) -> RangeInclusive<u32> {
        match event_type {
            EventType::Goal => self.goals.clone(),
            EventType::YellowCard => self.yellow_cards.clone(),
            EventType::RedCard => self.red_cards.clone(),
        }
    }
}

/// Produces the ordered event plan for a match.
pub trait EventPlanner: Send + Sync {
    fn plan(
        &self,
        rng: &mut dyn RngCore,
        match_id: MatchId,
        home: &TeamRoster,
        away: &TeamRoster,
    ) -> Result<Vec<NewEvent>>;
}

/// Uniform random event generator.
#[derive(Debug, Clone, Default)]
pub struct EventGenerator {
    config: EventGenerationConfig,
}

impl EventGenerator {
    pub fn new(config: EventGenerationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EventGenerationConfig {
        &self.config
    }

    pub fn generate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        match_id: MatchId,
        home: &TeamRoster,
        away: &TeamRoster,
    ) -> Result<Vec<NewEvent>> {
        self.config.validate()?;
        for roster in [home, away] {
            if roster.is_empty() {
                return Err(MatchdayError::validation(format!(
                    "team #{} has no players to attribute events to",
                    roster.team_id
                )));
            }
        }

        let mut events = Vec::new();
        for event_type in [EventType::Goal, EventType::YellowCard, EventType::RedCard] {
            let count = rng.gen_range(self.config.count_range(event_type));
            for _ in 0..count {
                events.push(draw_event(rng, match_id, event_type, home, away)?);
            }
        }

        // sort_by_key is stable: same-minute events keep generation order
        events.sort_by_key(|e| e.minute);
        Ok(events)
    }
}

impl EventPlanner for EventGenerator {
    fn plan(
        &self,
        rng: &mut dyn RngCore,
        match_id: MatchId,
        home: &TeamRoster,
        away: &TeamRoster,
    ) -> Result<Vec<NewEvent>> {
        self.generate(rng, match_id, home, away)
    }
}

fn draw_event<R: Rng + ?Sized>(
    rng: &mut R,
    match_id: MatchId,
    event_type: EventType,
    home: &TeamRoster,
    away: &TeamRoster,
) -> Result<NewEvent> {
    let roster = if rng.gen_bool(0.5) { home } else { away };
    let minute = rng.gen_range(EventGenerationConfig::minute_range(event_type));
    let player_id = *roster.player_ids.choose(rng).ok_or_else(|| {
        MatchdayError::validation(format!("team #{} has no players", roster.team_id))
    })?;

    Ok(NewEvent {
        match_id,
        team_id: roster.team_id,
        player_id,
        event_type,
        minute,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rosters() -> (TeamRoster, TeamRoster) {
        (
            TeamRoster::new(1, (100..111).collect()),
            TeamRoster::new(2, (200..211).collect()),
        )
    }

    fn count(events: &[NewEvent], event_type: EventType) -> u32 {
        events.iter().filter(|e| e.event_type == event_type).count() as u32
    }

    #[test]
    fn test_generated_sequences_hold_invariants() {
        let (home, away) = rosters();
        let generator = EventGenerator::default();

        for seed in 0..300 {
            let mut rng = StdRng::seed_from_u64(seed);
            let events = generator.generate(&mut rng, 9, &home, &away).unwrap();

            assert!(events.windows(2).all(|w| w[0].minute <= w[1].minute));
            assert!(DEFAULT_GOALS.contains(&count(&events, EventType::Goal)));
            assert!(DEFAULT_YELLOW_CARDS.contains(&count(&events, EventType::YellowCard)));
            assert!(DEFAULT_RED_CARDS.contains(&count(&events, EventType::RedCard)));

            for event in &events {
                assert_eq!(event.match_id, 9);
                let roster = if event.team_id == home.team_id { &home } else { &away };
                assert!(roster.contains(event.player_id), "player {} not in team {}", event.player_id, event.team_id);
                match event.event_type {
                    EventType::RedCard => assert!(RED_CARD_MINUTES.contains(&event.minute)),
                    _ => assert!(MATCH_MINUTES.contains(&event.minute)),
                }
            }
        }
    }

    #[test]
    fn test_same_seed_gives_same_sequence() {
        let (home, away) = rosters();
        let generator = EventGenerator::default();
        let a = generator
            .generate(&mut StdRng::seed_from_u64(42), 1, &home, &away)
            .unwrap();
        let b = generator
            .generate(&mut StdRng::seed_from_u64(42), 1, &home, &away)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_exact_counts() {
        let (home, away) = rosters();
        let generator = EventGenerator::new(EventGenerationConfig::exact(3, 1, 1));
        let events = generator
            .generate(&mut StdRng::seed_from_u64(8), 1, &home, &away)
            .unwrap();
        assert_eq!(events.len(), 5);
        assert_eq!(count(&events, EventType::Goal), 3);
    }

    #[test]
    fn test_both_teams_get_events_over_many_runs() {
        let (home, away) = rosters();
        let generator = EventGenerator::default();
        let mut rng = StdRng::seed_from_u64(99);
        let mut home_events = 0;
        let mut away_events = 0;
        for _ in 0..100 {
            for event in generator.generate(&mut rng, 1, &home, &away).unwrap() {
                if event.team_id == home.team_id {
                    home_events += 1;
                } else {
                    away_events += 1;
                }
            }
        }
        assert!(home_events > 0 && away_events > 0);
    }

    #[test]
    fn test_empty_roster_fails_with_validation() {
        let (home, _) = rosters();
        let empty = TeamRoster::new(2, Vec::new());
        let err = EventGenerator::default()
            .generate(&mut StdRng::seed_from_u64(1), 1, &home, &empty)
            .unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("#2"));
    }

    #[test]
    fn test_inverted_count_range_fails_with_validation() {
        let (home, away) = rosters();
        let config = EventGenerationConfig {
            goals: 6..=3,
            ..Default::default()
        };
        let err = EventGenerator::new(config)
            .generate(&mut StdRng::seed_from_u64(1), 1, &home, &away)
            .unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("goal"));
    }

    #[test]
    fn test_same_minute_events_keep_generation_order() {
        let (home, away) = rosters();
        let generator = EventGenerator::new(EventGenerationConfig::exact(6, 4, 2));
        let order = |t: EventType| match t {
            EventType::Goal => 0,
            EventType::YellowCard => 1,
            EventType::RedCard => 2,
        };

        let mut ties = 0;
        for seed in 0..500 {
            let events = generator
                .generate(&mut StdRng::seed_from_u64(seed), 1, &home, &away)
                .unwrap();
            for w in events.windows(2).filter(|w| w[0].minute == w[1].minute) {
                ties += 1;
                assert!(
                    order(w[0].event_type) <= order(w[1].event_type),
                    "seed {}: {:?} before {:?} at minute {}",
                    seed,
                    w[0].event_type,
                    w[1].event_type,
                    w[0].minute
                );
            }
        }
        assert!(ties > 0);
    }

    #[test]
    fn test_planner_trait_object() {
        let (home, away) = rosters();
        let planner: Box<dyn EventPlanner> = Box::new(EventGenerator::default());
        let mut rng = StdRng::seed_from_u64(5);
        let events = planner.plan(&mut rng, 4, &home, &away).unwrap();
        assert!(!events.is_empty());
    }
}

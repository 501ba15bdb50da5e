//! Match lifecycle driver
//!
//! Runs one simulated match end to end against a `DataGateway`:
//! provision rosters, open the match, plan events, persist them in minute
//! order while keeping the score, close the match and read it back.
//!
//! Any failure aborts the run. Nothing is rolled back, so a run that fails
//! half-way leaves its match `in_progress` with the events written so far.
//! A stored score that disagrees with the goal tally on read-back is an error.

use crate::error::{MatchdayError, Result};
use crate::gateway::DataGateway;
use crate::models::{Match, MatchEvent, MatchId, MatchStatus, NewEvent, TeamId, TeamRoster};
use crate::simulation::events::{EventGenerationConfig, EventPlanner};
use crate::simulation::roster::RosterProvisioner;
use crate::simulation::score::Score;
use crate::team_catalog::Fixture;
use chrono::Utc;
use rand::RngCore;
use serde::Serialize;
use tracing::{info, warn};

/// Outcome of a completed simulation.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub match_id: MatchId,
    pub home_team: TeamId,
    pub away_team: TeamId,
    /// Match row as read back after the final status update.
    pub final_match: Match,
    /// Persisted events in the order they were written.
    pub events: Vec<MatchEvent>,
}

impl SimulationReport {
    pub fn final_score(&self) -> Score {
        Score::new(self.final_match.home_score, self.final_match.away_score)
    }
}

pub struct MatchSimulator<'a, G: DataGateway + ?Sized, P: EventPlanner> {
    gateway: &'a G,
    planner: P,
}

impl<'a, G: DataGateway + ?Sized, P: EventPlanner> MatchSimulator<'a, G, P> {
    pub fn new(gateway: &'a G, planner: P) -> Self {
        Self { gateway, planner }
    }

    pub async fn simulate<R: RngCore>(&self, fixture: &Fixture, rng: &mut R) -> Result<SimulationReport> {
        let teams = RosterProvisioner::new(self.gateway)
            .provision(fixture, rng)
            .await?;

        let mut status = MatchStatus::Scheduled.transition_to(MatchStatus::InProgress)?;
        let match_id = self
            .gateway
            .create_match(teams.home, teams.away, Utc::now(), status)
            .await?;
        info!(
            "Created match #{} between team #{} ({}) and team #{} ({})",
            match_id, teams.home, fixture.home.name, teams.away, fixture.away.name
        );

        let home = TeamRoster::new(teams.home, self.gateway.list_player_ids(teams.home).await?);
        let away = TeamRoster::new(teams.away, self.gateway.list_player_ids(teams.away).await?);
        let planned = self.planner.plan(&mut *rng, match_id, &home, &away)?;
        validate_plan(match_id, &home, &away, &planned)?;

        let mut score = Score::default();
        let mut events = Vec::with_capacity(planned.len());
        for event in &planned {
            let event_id = self.gateway.insert_event(event).await?;
            if let Some(side) = Score::scoring_side(home.team_id, event) {
                self.gateway.increment_score(match_id, side).await?;
                score = score.apply(home.team_id, event);
            }
            info!("{}': player {} - {}", event.minute, event.player_id, event.event_type);
            events.push(MatchEvent::from_new(event_id, event));
        }

        status = status.transition_to(MatchStatus::Finished)?;
        self.gateway.set_match_status(match_id, status).await?;

        let final_match = self.gateway.get_match(match_id).await?;
        if final_match.home_score != score.home || final_match.away_score != score.away {
            warn!(
                "Stored score {}-{} for match #{} differs from event tally {}",
                final_match.home_score, final_match.away_score, match_id, score
            );
            return Err(MatchdayError::validation(format!(
                "match #{} stored score {} - {} differs from event tally {}",
                match_id, final_match.home_score, final_match.away_score, score
            )));
        }
        info!(
            "Final score: {} - {}",
            final_match.home_score, final_match.away_score
        );

        Ok(SimulationReport {
            match_id,
            home_team: teams.home,
            away_team: teams.away,
            final_match,
            events,
        })
    }
}

/// Reject plans that would break the event invariants before anything is written.
fn validate_plan(
    match_id: MatchId,
    home: &TeamRoster,
    away: &TeamRoster,
    events: &[NewEvent],
) -> Result<()> {
    let mut previous_minute = 0;
    for event in events {
        if event.match_id != match_id {
            return Err(MatchdayError::validation(format!(
                "event planned for match #{} inside match #{}",
                event.match_id, match_id
            )));
        }
        let roster = if event.team_id == home.team_id {
            home
        } else if event.team_id == away.team_id {
            away
        } else {
            return Err(MatchdayError::validation(format!(
                "team #{} does not play in match #{}",
                event.team_id, match_id
            )));
        };
        if !roster.contains(event.player_id) {
            return Err(MatchdayError::validation(format!(
                "player #{} is not on team #{}",
                event.player_id, event.team_id
            )));
        }
        if !EventGenerationConfig::minute_range(event.event_type).contains(&event.minute) {
            return Err(MatchdayError::validation(format!(
                "{} at minute {} is out of range",
                event.event_type, event.minute
            )));
        }
        if event.minute < previous_minute {
            return Err(MatchdayError::validation(
                "planned events are not in chronological order",
            ));
        }
        previous_minute = event.minute;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{CatalogStore, MemoryStore};
    use crate::models::EventType;
    use crate::simulation::events::EventGenerator;
    use crate::team_catalog::TeamSpec;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fixture() -> Fixture {
        Fixture::new(
            TeamSpec::new("Team A", "Team A Country"),
            TeamSpec::new("Team B", "Team B Country"),
        )
    }

    /// Plays back a fixed list of (home?, event type, minute) entries,
    /// always picking the first rostered player.
    struct ScriptedPlanner(Vec<(bool, EventType, i32)>);

    impl EventPlanner for ScriptedPlanner {
        fn plan(
            &self,
            _rng: &mut dyn RngCore,
            match_id: MatchId,
            home: &TeamRoster,
            away: &TeamRoster,
        ) -> Result<Vec<NewEvent>> {
            Ok(self
                .0
                .iter()
                .map(|&(is_home, event_type, minute)| {
                    let roster = if is_home { home } else { away };
                    NewEvent {
                        match_id,
                        team_id: roster.team_id,
                        player_id: roster.player_ids[0],
                        event_type,
                        minute,
                    }
                })
                .collect())
        }
    }

    /// Store that accepts score increments without applying them.
    struct DroppedIncrements(MemoryStore);

    #[async_trait::async_trait]
    impl DataGateway for DroppedIncrements {
        async fn upsert_team(&self, name: &str, country: &str) -> Result<TeamId> {
            self.0.upsert_team(name, country).await
        }

        async fn count_players(&self, team_id: TeamId) -> Result<i64> {
            self.0.count_players(team_id).await
        }

        async fn insert_player(
            &self,
            name: &str,
            age: i32,
            position: crate::models::Position,
            team_id: TeamId,
        ) -> Result<crate::models::PlayerId> {
            self.0.insert_player(name, age, position, team_id).await
        }

        async fn create_match(
            &self,
            home_team: TeamId,
            away_team: TeamId,
            match_date: chrono::DateTime<Utc>,
            status: MatchStatus,
        ) -> Result<MatchId> {
            self.0.create_match(home_team, away_team, match_date, status).await
        }

        async fn list_player_ids(&self, team_id: TeamId) -> Result<Vec<crate::models::PlayerId>> {
            self.0.list_player_ids(team_id).await
        }

        async fn insert_event(&self, event: &NewEvent) -> Result<crate::models::EventId> {
            self.0.insert_event(event).await
        }

        async fn increment_score(&self, _match_id: MatchId, _side: crate::models::Side) -> Result<()> {
            Ok(())
        }

        async fn set_match_status(&self, match_id: MatchId, status: MatchStatus) -> Result<()> {
            self.0.set_match_status(match_id, status).await
        }

        async fn get_match(&self, match_id: MatchId) -> Result<Match> {
            self.0.get_match(match_id).await
        }
    }

    #[tokio::test]
    async fn test_score_mismatch_on_read_back_is_an_error() {
        let store = DroppedIncrements(MemoryStore::new());
        let planner = ScriptedPlanner(vec![(true, EventType::Goal, 10)]);

        let err = MatchSimulator::new(&store, planner)
            .simulate(&fixture(), &mut StdRng::seed_from_u64(1))
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("tally 1 - 0"));
    }

    #[tokio::test]
    async fn test_random_run_keeps_score_consistent() {
        let store = MemoryStore::new();
        let simulator = MatchSimulator::new(&store, EventGenerator::default());
        let mut rng = StdRng::seed_from_u64(2024);

        let report = simulator.simulate(&fixture(), &mut rng).await.unwrap();

        assert_eq!(report.final_match.status, MatchStatus::Finished);
        let goals = |team: TeamId| {
            report
                .events
                .iter()
                .filter(|e| e.event_type == EventType::Goal && e.team_id == team)
                .count() as i32
        };
        assert_eq!(report.final_match.home_score, goals(report.home_team));
        assert_eq!(report.final_match.away_score, goals(report.away_team));
        assert_eq!(store.events_of(report.match_id), report.events);
    }

    #[tokio::test]
    async fn test_plan_with_foreign_player_is_rejected_before_writes() {
        struct ForeignPlayer;
        impl EventPlanner for ForeignPlayer {
            fn plan(
                &self,
                _rng: &mut dyn RngCore,
                match_id: MatchId,
                home: &TeamRoster,
                away: &TeamRoster,
            ) -> Result<Vec<NewEvent>> {
                Ok(vec![NewEvent {
                    match_id,
                    team_id: home.team_id,
                    player_id: away.player_ids[0],
                    event_type: EventType::Goal,
                    minute: 10,
                }])
            }
        }

        let store = MemoryStore::new();
        let simulator = MatchSimulator::new(&store, ForeignPlayer);
        let err = simulator
            .simulate(&fixture(), &mut StdRng::seed_from_u64(1))
            .await
            .unwrap_err();
        assert!(err.is_validation());

        let matches = store.list_matches().await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].status, MatchStatus::InProgress);
        assert!(store.events_of(matches[0].id).is_empty());
    }

    #[tokio::test]
    async fn test_unsorted_plan_is_rejected() {
        let store = MemoryStore::new();
        let planner = ScriptedPlanner(vec![
            (true, EventType::Goal, 50),
            (false, EventType::Goal, 10),
        ]);
        let err = MatchSimulator::new(&store, planner)
            .simulate(&fixture(), &mut StdRng::seed_from_u64(1))
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_early_red_card_is_rejected() {
        let store = MemoryStore::new();
        let planner = ScriptedPlanner(vec![(true, EventType::RedCard, 5)]);
        let err = MatchSimulator::new(&store, planner)
            .simulate(&fixture(), &mut StdRng::seed_from_u64(1))
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_scripted_run_reports_events_in_order() {
        let store = MemoryStore::new();
        let planner = ScriptedPlanner(vec![
            (true, EventType::Goal, 12),
            (false, EventType::YellowCard, 30),
            (true, EventType::Goal, 55),
            (false, EventType::RedCard, 80),
        ]);
        let report = MatchSimulator::new(&store, planner)
            .simulate(&fixture(), &mut StdRng::seed_from_u64(1))
            .await
            .unwrap();

        assert_eq!(report.final_score(), Score::new(2, 0));
        let minutes: Vec<i32> = report.events.iter().map(|e| e.minute).collect();
        assert_eq!(minutes, vec![12, 30, 55, 80]);
    }
}

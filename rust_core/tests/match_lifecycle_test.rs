//! Catalog and simulator working against one store

use matchday_core::models::{EventType, MatchStatus, PlayerDetails, Position};
use matchday_core::simulation::SQUAD_SIZE;
use matchday_core::{
    Catalog, EventGenerationConfig, EventGenerator, Fixture, MatchSimulator, MemoryStore,
    TeamSpec,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

fn fixture() -> Fixture {
    Fixture::new(
        TeamSpec::new("AC Sparta", "Czech Republic"),
        TeamSpec::new("SK Slavia", "Czech Republic"),
    )
}

#[tokio::test]
async fn test_simulated_match_is_visible_through_catalog() {
    let store = Arc::new(MemoryStore::new());
    let catalog = Catalog::new(store.clone());
    let generator = EventGenerator::new(EventGenerationConfig::exact(4, 2, 1));

    let report = MatchSimulator::new(store.as_ref(), generator)
        .simulate(&fixture(), &mut StdRng::seed_from_u64(21))
        .await
        .unwrap();

    let matches = catalog.list_matches().await.unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].id, report.match_id);
    assert_eq!(matches[0].status, MatchStatus::Finished);
    assert_eq!(matches[0].home_score + matches[0].away_score, 4);

    assert_eq!(report.events.len(), 7);
    let goals = report
        .events
        .iter()
        .filter(|e| e.event_type == EventType::Goal)
        .count();
    assert_eq!(goals, 4);

    let players = catalog.team_players(report.home_team).await.unwrap();
    assert_eq!(players.len(), SQUAD_SIZE);
    assert_eq!(catalog.team_matches(report.away_team).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_partial_squad_is_topped_up_to_eleven() {
    let store = Arc::new(MemoryStore::new());
    let catalog = Catalog::new(store.clone());

    let team = catalog.create_team("AC Sparta", "Czech Republic").await.unwrap();
    for name in ["Alex Brown", "Jordan Taylor", "Morgan Davis"] {
        let details = PlayerDetails {
            name: name.to_string(),
            age: 27,
            position: Position::Defender,
        };
        catalog.add_player(team.id, &details).await.unwrap();
    }

    let report = MatchSimulator::new(store.as_ref(), EventGenerator::default())
        .simulate(&fixture(), &mut StdRng::seed_from_u64(8))
        .await
        .unwrap();

    assert_eq!(report.home_team, team.id);
    assert_eq!(store.players_of(team.id).len(), SQUAD_SIZE);
    assert_eq!(store.teams_named("AC Sparta"), 1);
}

#[tokio::test]
async fn test_deleting_team_removes_simulated_history() {
    let store = Arc::new(MemoryStore::new());
    let catalog = Catalog::new(store.clone());

    let report = MatchSimulator::new(store.as_ref(), EventGenerator::default())
        .simulate(&fixture(), &mut StdRng::seed_from_u64(13))
        .await
        .unwrap();
    assert!(!store.events_of(report.match_id).is_empty());

    catalog.delete_team(report.home_team).await.unwrap();

    assert!(store.events_of(report.match_id).is_empty());
    assert!(catalog.list_matches().await.unwrap_err().is_not_found());
    assert!(catalog
        .team_players(report.home_team)
        .await
        .unwrap_err()
        .is_not_found());
    assert_eq!(store.players_of(report.away_team).len(), SQUAD_SIZE);
}

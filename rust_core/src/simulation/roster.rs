//! Roster provisioning
//!
//! Makes sure both teams of a fixture exist and field a formation-shaped
//! squad before a match is simulated.

use crate::error::{MatchdayError, Result};
use crate::gateway::DataGateway;
use crate::models::{Position, TeamId};
use crate::team_catalog::{Fixture, TeamSpec};
use rand::seq::SliceRandom;
use rand::Rng;
use std::ops::Range;
use tracing::{debug, info};

/// Players per provisioned squad.
pub const SQUAD_SIZE: usize = 11;

/// Squad shape, consumed in order: 1 goalkeeper, 4 defenders, 3 midfielders, 3 forwards.
pub const FORMATION: &[(Position, usize)] = &[
    (Position::Goalkeeper, 1),
    (Position::Defender, 4),
    (Position::Midfielder, 3),
    (Position::Forward, 3),
];

pub const FIRST_NAMES: [&str; 10] = [
    "Alex", "Jamie", "Jordan", "Casey", "Taylor", "Morgan", "Pat", "Sam", "Chris", "Robin",
];

pub const LAST_NAMES: [&str; 10] = [
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Miller", "Davis", "Garcia", "Rodriguez",
    "Wilson",
];

/// Player ages are drawn from this half-open range.
pub const AGE_RANGE: Range<i32> = 20..30;

/// Formation slots expanded one position per player.
pub fn formation_slots() -> impl Iterator<Item = Position> {
    FORMATION
        .iter()
        .flat_map(|&(position, count)| std::iter::repeat(position).take(count))
}

pub fn random_player_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    // Both pools are non-empty constants.
    let first = FIRST_NAMES.choose(rng).copied().unwrap_or("Alex");
    let last = LAST_NAMES.choose(rng).copied().unwrap_or("Smith");
    format!("{} {}", first, last)
}

pub fn random_age<R: Rng + ?Sized>(rng: &mut R) -> i32 {
    rng.gen_range(AGE_RANGE)
}

/// Team ids resolved for a fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProvisionedTeams {
    pub home: TeamId,
    pub away: TeamId,
}

pub struct RosterProvisioner<'a, G: DataGateway + ?Sized> {
    gateway: &'a G,
}

impl<'a, G: DataGateway + ?Sized> RosterProvisioner<'a, G> {
    pub fn new(gateway: &'a G) -> Self {
        Self { gateway }
    }

    /// Upsert both teams and top up their squads.
    pub async fn provision<R: Rng + ?Sized>(
        &self,
        fixture: &Fixture,
        rng: &mut R,
    ) -> Result<ProvisionedTeams> {
        let home = self.ensure_team(&fixture.home).await?;
        let away = self.ensure_team(&fixture.away).await?;
        if home == away {
            return Err(MatchdayError::validation(format!(
                "fixture needs two distinct teams, both sides resolved to '{}'",
                fixture.home.name
            )));
        }

        for team_id in [home, away] {
            self.ensure_squad(team_id, rng).await?;
        }

        Ok(ProvisionedTeams { home, away })
    }

    pub async fn ensure_team(&self, team: &TeamSpec) -> Result<TeamId> {
        let id = self.gateway.upsert_team(&team.name, &team.country).await?;
        debug!("Team '{}' ({}) resolved to #{}", team.name, team.country, id);
        Ok(id)
    }

    /// Fill the formation slots the team does not have yet.
    ///
    /// Only the player count is compared; existing positions are not
    /// reconciled. Returns the number of players added.
    pub async fn ensure_squad<R: Rng + ?Sized>(&self, team_id: TeamId, rng: &mut R) -> Result<usize> {
        let existing = usize::try_from(self.gateway.count_players(team_id).await?).unwrap_or(0);
        if existing >= SQUAD_SIZE {
            return Ok(0);
        }

        let mut added = 0;
        for position in formation_slots().skip(existing) {
            let name = random_player_name(rng);
            let age = random_age(rng);
            self.gateway
                .insert_player(&name, age, position, team_id)
                .await?;
            added += 1;
        }

        info!(
            "Team #{}: added {} players ({} already registered)",
            team_id, added, existing
        );
        Ok(added)
    }
}

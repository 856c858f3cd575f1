//! Arena of teams and players.
//!
//! Teams hold `PlayerId` lists instead of player objects and players carry an optional
//! `TeamId`, so there are no ownership cycles. Business keys are indexed separately.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    MatchResult, Player, PlayerId, PlayerKey, Role, Team, TeamId, TeamKey, TitleKind,
};
use crate::error::{Result, SimError};

/// A participant in a drafted match: a rostered player, or a stand-in for a role nobody
/// fills (exhibition drafts without a roster).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Competitor {
    Real(PlayerId),
    Placeholder(Role),
}

impl Competitor {
    pub fn player_id(&self) -> Option<PlayerId> {
        match self {
            Competitor::Real(id) => Some(*id),
            Competitor::Placeholder(_) => None,
        }
    }
}

/// Starting five of a team, one competitor per role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lineup {
    pub team: TeamId,
    pub slots: BTreeMap<Role, Competitor>,
}

impl Lineup {
    /// Lineup made only of placeholders.
    pub fn placeholder(team: TeamId) -> Self {
        Self {
            team,
            slots: Role::ALL.iter().map(|role| (*role, Competitor::Placeholder(*role))).collect(),
        }
    }

    pub fn get(&self, role: Role) -> Competitor {
        self.slots.get(&role).copied().unwrap_or(Competitor::Placeholder(role))
    }

    /// Competitors in role order.
    pub fn competitors(&self) -> Vec<Competitor> {
        Role::ALL.iter().map(|role| self.get(*role)).collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registry {
    teams: Vec<Team>,
    players: Vec<Player>,
    #[serde(skip)]
    team_keys: BTreeMap<TeamKey, TeamId>,
    #[serde(skip)]
    player_keys: BTreeMap<PlayerKey, PlayerId>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild key indices after deserialization.
    pub fn reindex(&mut self) {
        self.team_keys = self
            .teams
            .iter()
            .enumerate()
            .map(|(i, t)| (t.key(), TeamId(i as u32)))
            .collect();
        self.player_keys = self
            .players
            .iter()
            .enumerate()
            .map(|(i, p)| (p.key(), PlayerId(i as u32)))
            .collect();
    }

    pub fn add_team(&mut self, team: Team) -> Result<TeamId> {
        let key = team.key();
        if self.team_keys.contains_key(&key) {
            return Err(SimError::DuplicateKey(format!("team {} ({})", key.name, key.region)));
        }
        let id = TeamId(self.teams.len() as u32);
        self.team_keys.insert(key, id);
        self.teams.push(team);
        Ok(id)
    }

    /// Register `player` and append them to the team's roster for their role.
    pub fn add_player(&mut self, team_id: TeamId, mut player: Player) -> Result<PlayerId> {
        let key = player.key();
        if self.player_keys.contains_key(&key) {
            return Err(SimError::DuplicateKey(format!("player {} ({})", key.name, key.role.label())));
        }
        let id = PlayerId(self.players.len() as u32);
        let role = player.role;
        player.team = Some(team_id);
        self.team_mut(team_id)?.roster.entry(role).or_default().push(id);
        self.player_keys.insert(key, id);
        self.players.push(player);
        Ok(id)
    }

    pub fn team(&self, id: TeamId) -> Result<&Team> {
        self.teams.get(id.0 as usize).ok_or(SimError::UnknownTeam(id))
    }

    pub fn team_mut(&mut self, id: TeamId) -> Result<&mut Team> {
        self.teams.get_mut(id.0 as usize).ok_or(SimError::UnknownTeam(id))
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id.0 as usize)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(id.0 as usize)
    }

    pub fn find_team(&self, key: &TeamKey) -> Option<TeamId> {
        self.team_keys.get(key).copied()
    }

    pub fn find_team_by_name(&self, name: &str) -> Option<TeamId> {
        self.teams
            .iter()
            .position(|t| t.name == name)
            .map(|i| TeamId(i as u32))
    }

    pub fn find_player(&self, key: &PlayerKey) -> Option<PlayerId> {
        self.player_keys.get(key).copied()
    }

    pub fn team_ids(&self) -> impl Iterator<Item = TeamId> {
        (0..self.teams.len() as u32).map(TeamId)
    }

    pub fn teams(&self) -> impl Iterator<Item = (TeamId, &Team)> {
        self.teams.iter().enumerate().map(|(i, t)| (TeamId(i as u32), t))
    }

    pub fn players(&self) -> impl Iterator<Item = (PlayerId, &Player)> {
        self.players.iter().enumerate().map(|(i, p)| (PlayerId(i as u32), p))
    }

    /// Team name for display, `"?"` for unknown ids.
    pub fn team_name(&self, id: TeamId) -> &str {
        self.team(id).map(|t| t.name.as_str()).unwrap_or("?")
    }

    pub fn competitor_name(&self, competitor: Competitor) -> String {
        match competitor {
            Competitor::Real(id) => self
                .player(id)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| format!("Player #{}", id.0)),
            Competitor::Placeholder(role) => format!("{} player", role.label()),
        }
    }

    /// Starters for every role. A role with no rostered player is an error.
    pub fn starting_lineup(&self, team_id: TeamId) -> Result<Lineup> {
        let team = self.team(team_id)?;
        let mut slots = BTreeMap::new();
        for role in Role::ALL {
            let starter = team.starter(role).ok_or_else(|| SimError::MissingRoster {
                team: team.name.clone(),
                role,
            })?;
            slots.insert(role, Competitor::Real(starter));
        }
        Ok(Lineup { team: team_id, slots })
    }

    pub fn total_salary(&self, team_id: TeamId) -> Result<u64> {
        let team = self.team(team_id)?;
        Ok(team
            .roster
            .values()
            .flatten()
            .filter_map(|id| self.player(*id))
            .map(|p| p.salary as u64)
            .sum())
    }

    /// Fold a series result into both teams' records and every real participant's record.
    pub fn record_result(&mut self, result: &MatchResult) -> Result<()> {
        let diff = result.game_diff_for(result.winner);
        self.team_mut(result.winner)?.record_match(true, diff);
        self.team_mut(result.loser)?.record_match(false, -diff);

        for (stats, won) in [(&result.winner_stats, true), (&result.loser_stats, false)] {
            for line in &stats.players {
                if let Some(player) = line.competitor.player_id().and_then(|id| self.player_mut(id)) {
                    player.record_game(won);
                }
            }
        }
        debug!(
            winner = self.team_name(result.winner),
            loser = self.team_name(result.loser),
            score = %format!("{}-{}", result.winner_score, result.loser_score),
            "recorded result"
        );
        Ok(())
    }

    pub fn award_title(&mut self, team_id: TeamId, kind: TitleKind, points: u32) -> Result<()> {
        self.team_mut(team_id)?.award_title(kind, points);
        Ok(())
    }

    pub fn reset_season_stats(&mut self, teams: &[TeamId]) -> Result<()> {
        for id in teams {
            self.team_mut(*id)?.reset_season_stats();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PlayerAttributes;
    use chrono::NaiveDate;

    fn player(name: &str, role: Role) -> Player {
        Player::new(
            name,
            role,
            PlayerAttributes::new(70, 70, 70, 70),
            "KR",
            100_000,
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        )
    }

    fn full_team(registry: &mut Registry, name: &str) -> TeamId {
        let id = registry.add_team(Team::new(name, "LCK", 1_000_000)).unwrap();
        for role in Role::ALL {
            registry.add_player(id, player(&format!("{name}-{}", role.label()), role)).unwrap();
        }
        id
    }

    #[test]
    fn test_duplicate_team_key_is_rejected() {
        let mut registry = Registry::new();
        registry.add_team(Team::new("T1", "LCK", 0)).unwrap();
        registry.add_team(Team::new("T1", "LPL", 0)).unwrap();
        let err = registry.add_team(Team::new("T1", "LCK", 5)).unwrap_err();
        assert!(matches!(err, SimError::DuplicateKey(_)));
    }

    #[test]
    fn test_duplicate_player_key_is_rejected() {
        let mut registry = Registry::new();
        let team = registry.add_team(Team::new("T1", "LCK", 0)).unwrap();
        registry.add_player(team, player("Faker", Role::Mid)).unwrap();
        registry.add_player(team, player("Faker", Role::Top)).unwrap();
        assert!(registry.add_player(team, player("Faker", Role::Mid)).is_err());
    }

    #[test]
    fn test_starting_lineup_uses_first_rostered_player() {
        let mut registry = Registry::new();
        let team = full_team(&mut registry, "Gen.G");
        let backup = registry.add_player(team, player("Backup", Role::Mid)).unwrap();

        let lineup = registry.starting_lineup(team).unwrap();
        assert_eq!(lineup.slots.len(), 5);
        assert_ne!(lineup.get(Role::Mid), Competitor::Real(backup));
        assert_eq!(registry.player(backup).unwrap().team, Some(team));
    }

    #[test]
    fn test_missing_role_is_an_error() {
        let mut registry = Registry::new();
        let team = registry.add_team(Team::new("Empty", "LEC", 0)).unwrap();
        registry.add_player(team, player("Solo", Role::Top)).unwrap();

        let err = registry.starting_lineup(team).unwrap_err();
        assert_eq!(
            err,
            SimError::MissingRoster { team: "Empty".to_string(), role: Role::Jungle }
        );
    }

    #[test]
    fn test_total_salary_and_reindex() {
        let mut registry = Registry::new();
        let team = full_team(&mut registry, "DRX");
        assert_eq!(registry.total_salary(team).unwrap(), 500_000);

        let json = serde_json::to_string(&registry).unwrap();
        let mut restored: Registry = serde_json::from_str(&json).unwrap();
        restored.reindex();
        assert_eq!(restored.find_team(&TeamKey::new("DRX", "LCK")), Some(team));
        assert!(restored
            .find_player(&PlayerKey { name: "DRX-Mid".into(), role: Role::Mid })
            .is_some());
    }

    #[test]
    fn test_unknown_team() {
        let registry = Registry::new();
        assert_eq!(registry.team(TeamId(9)).unwrap_err(), SimError::UnknownTeam(TeamId(9)));
        assert_eq!(registry.team_name(TeamId(9)), "?");
    }
}

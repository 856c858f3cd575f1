//! Placement payouts once a tournament is finished.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{Tournament, TournamentPhase};
use crate::config::SimConfig;
use crate::error::{Result, SimError};
use crate::models::{Registry, TeamId, TitleKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Finish {
    Champion,
    RunnerUp,
    SemiFinalist,
    QuarterFinalist,
    GroupStage,
}

impl Finish {
    /// Position in the placement point and prize share tables.
    fn tier(&self) -> usize {
        *self as usize
    }

    pub fn label(&self) -> &'static str {
        match self {
            Finish::Champion => "Champion",
            Finish::RunnerUp => "Runner-up",
            Finish::SemiFinalist => "Semifinalist",
            Finish::QuarterFinalist => "Quarterfinalist",
            Finish::GroupStage => "Group Stage",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub team: TeamId,
    pub finish: Finish,
    pub points: u32,
    pub prize: i64,
}

impl Tournament {
    /// Final placement of every entrant, best first.
    pub fn placements(&self, config: &SimConfig) -> Result<Vec<Placement>> {
        if self.phase != TournamentPhase::Finished {
            return Err(SimError::wrong_phase(TournamentPhase::Finished.label(), self.phase));
        }
        let settings = &config.tournament;

        let mut finishes: Vec<(TeamId, Finish)> = Vec::with_capacity(self.teams.len());
        if let Some(winner) = self.winner {
            finishes.push((winner, Finish::Champion));
        }
        for tie in &self.ties {
            let Some(loser) = self.knockout_matches.iter().find(|m| m.id == tie.match_id).and_then(|m| m.loser())
            else {
                continue;
            };
            let finish = match self.rounds.saturating_sub(tie.round + 1) {
                0 => Finish::RunnerUp,
                1 => Finish::SemiFinalist,
                _ => Finish::QuarterFinalist,
            };
            finishes.push((loser, finish));
        }
        for team in &self.teams {
            if !finishes.iter().any(|(placed, _)| placed == team) {
                finishes.push((*team, Finish::GroupStage));
            }
        }
        finishes.sort_by_key(|(_, finish)| *finish);

        Ok(finishes
            .into_iter()
            .map(|(team, finish)| {
                let points = settings.placement_points[finish.tier()];
                let share = settings.prize_shares.get(finish.tier()).copied().unwrap_or(0.0);
                let prize = (settings.prize_pool as f64 * share).round() as i64;
                Placement { team, finish, points, prize }
            })
            .collect())
    }

    /// Pay placement points and prize money, and give the winner its international title.
    /// Only the first call pays out.
    pub fn award_rewards(&mut self, registry: &mut Registry, config: &SimConfig) -> Result<Vec<Placement>> {
        let placements = self.placements(config)?;
        if self.rewards_paid {
            debug!(tournament = %self.name, "rewards already paid");
            return Ok(placements);
        }

        for placement in &placements {
            let team = registry.team_mut(placement.team)?;
            team.championship_points += placement.points;
            team.budget += placement.prize;
            if placement.finish == Finish::Champion {
                registry.award_title(placement.team, TitleKind::International, config.rewards.international_title_points)?;
            }
        }
        self.rewards_paid = true;

        let paid: i64 = placements.iter().map(|p| p.prize).sum();
        info!(tournament = %self.name, teams = placements.len(), paid, "tournament rewards paid");
        Ok(placements)
    }
}

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{Match, Registry, TeamId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadToHead {
    pub wins: u32,
    pub losses: u32,
}

/// One row of a division table, recomputed from match results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStanding {
    pub team: TeamId,
    pub matches_played: u32,
    pub wins: u32,
    pub losses: u32,
    /// Percentage in [0, 100].
    pub win_rate: f64,
    pub championship_points: u32,
    pub game_diff: i32,
    /// Positive for a win streak, negative for a loss streak.
    pub streak: i32,
    pub head_to_head: BTreeMap<TeamId, HeadToHead>,
}

impl TeamStanding {
    fn new(team: TeamId, opponents: &[TeamId], championship_points: u32) -> Self {
        Self {
            team,
            matches_played: 0,
            wins: 0,
            losses: 0,
            win_rate: 0.0,
            championship_points,
            game_diff: 0,
            streak: 0,
            head_to_head: opponents
                .iter()
                .filter(|other| **other != team)
                .map(|other| (*other, HeadToHead::default()))
                .collect(),
        }
    }

    pub fn head_to_head_wins(&self) -> u32 {
        self.head_to_head.values().map(|record| record.wins).sum()
    }

    fn record(&mut self, opponent: TeamId, won: bool, game_diff: i32) {
        let h2h = self.head_to_head.entry(opponent).or_default();
        if won {
            h2h.wins += 1;
            self.wins += 1;
            self.streak = if self.streak > 0 { self.streak + 1 } else { 1 };
        } else {
            h2h.losses += 1;
            self.losses += 1;
            self.streak = if self.streak < 0 { self.streak - 1 } else { -1 };
        }
        self.game_diff += game_diff;
    }

    /// Tiebreak order: wins, head-to-head wins, game differential, win rate.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        self.wins
            .cmp(&other.wins)
            .then_with(|| self.head_to_head_wins().cmp(&other.head_to_head_wins()))
            .then_with(|| self.game_diff.cmp(&other.game_diff))
            .then_with(|| self.win_rate.total_cmp(&other.win_rate))
    }
}

/// Build the ordered table for `teams` from the resolved matches in `matches`.
///
/// Results are folded in date order so streaks reflect the most recent run. Teams that tie
/// on every key keep their order in `teams`.
pub fn compute_standings(teams: &[TeamId], matches: &[Match], registry: &Registry) -> Result<Vec<TeamStanding>> {
    let mut rows = teams
        .iter()
        .map(|team| -> Result<TeamStanding> {
            Ok(TeamStanding::new(*team, teams, registry.team(*team)?.championship_points))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut played: Vec<&Match> = matches.iter().filter(|m| m.is_resolved()).collect();
    played.sort_by_key(|m| m.date);

    for m in played {
        let Some(result) = &m.result else {
            continue;
        };
        for row in rows.iter_mut() {
            if !m.involves(row.team) {
                continue;
            }
            if let Some(opponent) = m.opponent_of(row.team) {
                row.record(opponent, result.winner == row.team, result.game_diff_for(row.team));
            }
        }
    }

    for row in rows.iter_mut() {
        row.matches_played = row.wins + row.losses;
        if row.matches_played > 0 {
            row.win_rate = row.wins as f64 / row.matches_played as f64 * 100.0;
        }
    }

    rows.sort_by(|a, b| b.rank_cmp(a));
    Ok(rows)
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Competitor, DragonState, MatchEvent, PlayerId, Role, TeamId};

/// Series aggregate for one competitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerMatchStats {
    pub competitor: Competitor,
    pub role: Role,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub cs: u32,
    pub vision_score: u32,
    pub damage_dealt: u32,
    pub gold_earned: u32,
}

impl PlayerMatchStats {
    /// (kills + assists) / deaths rounded to two decimals, or kills + assists when deathless.
    pub fn kda(&self) -> f64 {
        let takedowns = (self.kills + self.assists) as f64;
        if self.deaths == 0 {
            return takedowns;
        }
        (takedowns / self.deaths as f64 * 100.0).round() / 100.0
    }

    pub fn mvp_score(&self) -> f64 {
        self.kda() * 10.0 + self.damage_dealt as f64 / 1000.0 + self.vision_score as f64 / 2.0
    }

    /// Multiply every counter by the number of games played.
    pub fn scaled(mut self, games: u32) -> Self {
        self.kills *= games;
        self.deaths *= games;
        self.assists *= games;
        self.cs *= games;
        self.vision_score *= games;
        self.damage_dealt *= games;
        self.gold_earned *= games;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMatchStats {
    pub team: TeamId,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub towers: u32,
    pub inhibitors: u32,
    pub barons: u32,
    pub dragons: u32,
    pub total_gold: u32,
    pub players: Vec<PlayerMatchStats>,
    pub dragon_state: DragonState,
}

impl TeamMatchStats {
    /// Build team totals from the per-player lines. Objective counters start at zero.
    pub fn from_players(team: TeamId, players: Vec<PlayerMatchStats>) -> Self {
        Self {
            team,
            kills: players.iter().map(|p| p.kills).sum(),
            deaths: players.iter().map(|p| p.deaths).sum(),
            assists: players.iter().map(|p| p.assists).sum(),
            total_gold: players.iter().map(|p| p.gold_earned).sum(),
            towers: 0,
            inhibitors: 0,
            barons: 0,
            dragons: 0,
            players,
            dragon_state: DragonState::default(),
        }
    }

    pub fn player(&self, id: PlayerId) -> Option<&PlayerMatchStats> {
        self.players.iter().find(|p| p.competitor.player_id() == Some(id))
    }
}

/// Immutable outcome of a best-of-N series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub winner: TeamId,
    pub loser: TeamId,
    pub winner_score: u8,
    pub loser_score: u8,
    pub date: NaiveDate,
    /// Total minutes across every game of the series.
    pub duration: u32,
    pub winner_stats: TeamMatchStats,
    pub loser_stats: TeamMatchStats,
    pub events: Vec<MatchEvent>,
    /// `None` only when every competitor was a placeholder.
    pub mvp: Option<PlayerId>,
    /// Per-game probability that the eventual winner takes a game.
    pub winner_game_probability: f64,
}

impl MatchResult {
    pub fn games_played(&self) -> u32 {
        (self.winner_score + self.loser_score) as u32
    }

    /// Signed map differential from `team`'s point of view, zero for non-participants.
    pub fn game_diff_for(&self, team: TeamId) -> i32 {
        let diff = self.winner_score as i32 - self.loser_score as i32;
        if team == self.winner {
            diff
        } else if team == self.loser {
            -diff
        } else {
            0
        }
    }

    pub fn stats_for(&self, team: TeamId) -> Option<&TeamMatchStats> {
        if team == self.winner {
            Some(&self.winner_stats)
        } else if team == self.loser {
            Some(&self.loser_stats)
        } else {
            None
        }
    }

    pub fn all_player_stats(&self) -> impl Iterator<Item = &PlayerMatchStats> {
        self.winner_stats.players.iter().chain(self.loser_stats.players.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(kills: u32, deaths: u32, assists: u32) -> PlayerMatchStats {
        PlayerMatchStats {
            competitor: Competitor::Placeholder(Role::Mid),
            role: Role::Mid,
            kills,
            deaths,
            assists,
            cs: 200,
            vision_score: 30,
            damage_dealt: 20_000,
            gold_earned: 10_000,
        }
    }

    #[test]
    fn test_kda() {
        assert_eq!(line(3, 0, 7).kda(), 10.0);
        assert_eq!(line(2, 3, 2).kda(), 1.33);
        assert_eq!(line(0, 4, 0).kda(), 0.0);
    }

    #[test]
    fn test_mvp_score() {
        // 10 * 10 + 20 + 15
        assert!((line(3, 0, 7).mvp_score() - 135.0).abs() < 1e-9);
    }

    #[test]
    fn test_scaled_multiplies_every_counter() {
        let scaled = line(2, 1, 4).scaled(3);
        assert_eq!((scaled.kills, scaled.deaths, scaled.assists), (6, 3, 12));
        assert_eq!(scaled.cs, 600);
        assert_eq!(scaled.gold_earned, 30_000);
    }

    #[test]
    fn test_team_totals() {
        let stats = TeamMatchStats::from_players(TeamId(3), vec![line(2, 1, 4), line(5, 0, 1)]);
        assert_eq!(stats.kills, 7);
        assert_eq!(stats.deaths, 1);
        assert_eq!(stats.assists, 5);
        assert_eq!(stats.total_gold, 20_000);
        assert_eq!(stats.towers, 0);
    }
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{PlayerId, Role};

/// Business identity of a team: name plus region.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamKey {
    pub name: String,
    pub region: String,
}

impl TeamKey {
    pub fn new(name: impl Into<String>, region: impl Into<String>) -> Self {
        Self { name: name.into(), region: region.into() }
    }
}

/// Snapshot of one finished season, archived by [`Team::reset_season_stats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonRecord {
    pub wins: u32,
    pub losses: u32,
    pub championship_points: u32,
    pub game_differential: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TitleKind {
    Domestic,
    International,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub region: String,
    pub budget: i64,
    pub fanbase: u64,
    pub brand_value: u64,
    pub training_facilities: u8,
    pub roster: BTreeMap<Role, Vec<PlayerId>>,

    pub wins: u32,
    pub losses: u32,
    pub championship_points: u32,
    pub game_differential: i32,
    /// Positive for a winning streak, negative for a losing streak.
    pub current_streak: i32,

    pub championships: u32,
    pub world_championships: u32,
    pub domestic_titles: u32,
    pub season_history: Vec<SeasonRecord>,
}

impl Team {
    pub fn new(name: impl Into<String>, region: impl Into<String>, budget: i64) -> Self {
        Self {
            name: name.into(),
            region: region.into(),
            budget,
            fanbase: 100_000,
            brand_value: 1_000_000,
            training_facilities: 1,
            roster: Role::ALL.iter().map(|role| (*role, Vec::new())).collect(),
            wins: 0,
            losses: 0,
            championship_points: 0,
            game_differential: 0,
            current_streak: 0,
            championships: 0,
            world_championships: 0,
            domestic_titles: 0,
            season_history: Vec::new(),
        }
    }

    pub fn key(&self) -> TeamKey {
        TeamKey::new(self.name.clone(), self.region.clone())
    }

    pub fn games_played(&self) -> u32 {
        self.wins + self.losses
    }

    /// Win rate as a fraction in [0, 1].
    pub fn win_rate(&self) -> f64 {
        let total = self.games_played();
        if total == 0 {
            return 0.0;
        }
        self.wins as f64 / total as f64
    }

    /// First rostered player for `role`. That player is the starter.
    pub fn starter(&self, role: Role) -> Option<PlayerId> {
        self.roster.get(&role).and_then(|players| players.first().copied())
    }

    pub fn is_roster_complete(&self) -> bool {
        Role::ALL.iter().all(|role| self.starter(*role).is_some())
    }

    /// Record one series result. `game_diff` is the signed map differential from this
    /// team's point of view.
    pub fn record_match(&mut self, won: bool, game_diff: i32) {
        if won {
            self.wins += 1;
            self.current_streak = (self.current_streak + 1).max(1);
        } else {
            self.losses += 1;
            self.current_streak = (self.current_streak - 1).min(-1);
        }
        self.game_differential += game_diff;
    }

    /// Archive the current season (if any games were played) and zero the counters.
    pub fn reset_season_stats(&mut self) {
        if self.games_played() > 0 {
            self.season_history.push(SeasonRecord {
                wins: self.wins,
                losses: self.losses,
                championship_points: self.championship_points,
                game_differential: self.game_differential,
            });
        }
        self.wins = 0;
        self.losses = 0;
        self.championship_points = 0;
        self.game_differential = 0;
        self.current_streak = 0;
    }

    pub fn award_title(&mut self, kind: TitleKind, points: u32) {
        self.championships += 1;
        self.championship_points += points;
        match kind {
            TitleKind::Domestic => self.domestic_titles += 1,
            TitleKind::International => self.world_championships += 1,
        }
        self.brand_value += 5_000;
        self.fanbase += 10_000;
    }
}

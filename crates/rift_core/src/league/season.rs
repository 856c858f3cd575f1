use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::TeamId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Split {
    Spring,
    Summer,
}

impl Split {
    pub fn label(&self) -> &'static str {
        match self {
            Split::Spring => "Spring",
            Split::Summer => "Summer",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeasonPhase {
    RegularSeason,
    Playoffs,
    OffSeason,
}

impl SeasonPhase {
    pub fn label(&self) -> &'static str {
        match self {
            SeasonPhase::RegularSeason => "Regular Season",
            SeasonPhase::Playoffs => "Playoffs",
            SeasonPhase::OffSeason => "Off Season",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Season {
    pub split: Split,
    pub year: i32,
    pub start_date: NaiveDate,
    pub phase: SeasonPhase,
    pub current_week: u32,
    pub playoff_teams: Vec<TeamId>,
    pub champion: Option<TeamId>,
}

impl Season {
    /// A season that has just entered its regular season.
    pub fn new(split: Split, start_date: NaiveDate) -> Self {
        Self {
            split,
            year: start_date.year(),
            start_date,
            phase: SeasonPhase::RegularSeason,
            current_week: 0,
            playoff_teams: Vec::new(),
            champion: None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.phase == SeasonPhase::OffSeason && self.champion.is_some()
    }

    pub fn title(&self) -> String {
        format!("{} {}", self.split.label(), self.year)
    }
}

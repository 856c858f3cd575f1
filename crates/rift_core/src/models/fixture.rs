use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{MatchId, MatchResult, Side, TeamId};
use crate::draft::DraftState;
use crate::error::{Result, SimError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    /// At least one side is still waiting on an earlier bracket match.
    AwaitingTeams,
    Scheduled,
    Drafting,
    Drafted,
    Resolved,
}

/// A scheduled series between two teams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub home: Option<TeamId>,
    pub away: Option<TeamId>,
    pub date: NaiveDate,
    /// Regular-season week index; `None` for bracket and tournament matches.
    #[serde(default)]
    pub week: Option<u32>,
    pub best_of: u8,
    #[serde(default)]
    pub draft: Option<DraftState>,
    #[serde(default)]
    pub result: Option<MatchResult>,
}

impl Match {
    pub fn new(id: MatchId, home: TeamId, away: TeamId, date: NaiveDate, best_of: u8) -> Self {
        Self {
            id,
            home: Some(home),
            away: Some(away),
            date,
            week: None,
            best_of,
            draft: None,
            result: None,
        }
    }

    /// A match whose participants are filled in later.
    pub fn pending(id: MatchId, home: Option<TeamId>, away: Option<TeamId>, date: NaiveDate, best_of: u8) -> Self {
        Self { id, home, away, date, week: None, best_of, draft: None, result: None }
    }

    pub fn with_week(mut self, week: u32) -> Self {
        self.week = Some(week);
        self
    }

    pub fn status(&self) -> MatchStatus {
        if self.result.is_some() {
            MatchStatus::Resolved
        } else if self.home.is_none() || self.away.is_none() {
            MatchStatus::AwaitingTeams
        } else {
            match &self.draft {
                Some(draft) if draft.is_complete() => MatchStatus::Drafted,
                Some(_) => MatchStatus::Drafting,
                None => MatchStatus::Scheduled,
            }
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.result.is_some()
    }

    /// Both participants, or `UnassignedSlot` while a bracket slot is open.
    pub fn teams(&self) -> Result<(TeamId, TeamId)> {
        match (self.home, self.away) {
            (Some(home), Some(away)) => Ok((home, away)),
            _ => Err(SimError::UnassignedSlot(self.id)),
        }
    }

    pub fn involves(&self, team: TeamId) -> bool {
        self.home == Some(team) || self.away == Some(team)
    }

    pub fn opponent_of(&self, team: TeamId) -> Option<TeamId> {
        if self.home == Some(team) {
            self.away
        } else if self.away == Some(team) {
            self.home
        } else {
            None
        }
    }

    pub fn winner(&self) -> Option<TeamId> {
        self.result.as_ref().map(|r| r.winner)
    }

    pub fn loser(&self) -> Option<TeamId> {
        self.result.as_ref().map(|r| r.loser)
    }

    /// Open a fresh draft. The home team takes blue side when `home_is_blue`.
    pub fn start_draft(&mut self, home_is_blue: bool) -> Result<&mut DraftState> {
        let (home, away) = self.teams()?;
        let (blue, red) = if home_is_blue { (home, away) } else { (away, home) };
        Ok(self.draft.insert(DraftState::new(blue, red)))
    }

    pub fn side_of(&self, team: TeamId) -> Option<Side> {
        self.draft.as_ref().and_then(|d| d.side_of(team))
    }
}

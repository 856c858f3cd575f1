//! Six-team single-elimination playoff bracket.
//!
//! Seeds 3-6 play the quarterfinals, seeds 1 and 2 wait in the semifinals. Every open
//! position names the slot that feeds it, so advancing never depends on list positions.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SimError};
use crate::models::{Match, MatchId, MatchIdSequence, TeamId};

pub const PLAYOFF_TEAMS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayoffRound {
    QuarterFinals,
    SemiFinals,
    Finals,
}

impl PlayoffRound {
    pub fn label(&self) -> &'static str {
        match self {
            PlayoffRound::QuarterFinals => "Quarter-Finals",
            PlayoffRound::SemiFinals => "Semi-Finals",
            PlayoffRound::Finals => "Finals",
        }
    }

    /// Days after the last regular-season match.
    fn offset_days(&self) -> i64 {
        match self {
            PlayoffRound::QuarterFinals => 7,
            PlayoffRound::SemiFinals => 14,
            PlayoffRound::Finals => 21,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BracketSlot {
    Quarterfinal1,
    Quarterfinal2,
    Semifinal1,
    Semifinal2,
    Final,
}

impl BracketSlot {
    pub const ALL: [BracketSlot; 5] = [
        BracketSlot::Quarterfinal1,
        BracketSlot::Quarterfinal2,
        BracketSlot::Semifinal1,
        BracketSlot::Semifinal2,
        BracketSlot::Final,
    ];

    pub fn round(&self) -> PlayoffRound {
        match self {
            BracketSlot::Quarterfinal1 | BracketSlot::Quarterfinal2 => PlayoffRound::QuarterFinals,
            BracketSlot::Semifinal1 | BracketSlot::Semifinal2 => PlayoffRound::SemiFinals,
            BracketSlot::Final => PlayoffRound::Finals,
        }
    }

    /// Where each side of this slot's match comes from. Seeds are 1-based.
    pub fn sources(&self) -> (SlotSource, SlotSource) {
        use SlotSource::{Seed, WinnerOf};
        match self {
            BracketSlot::Quarterfinal1 => (Seed(3), Seed(6)),
            BracketSlot::Quarterfinal2 => (Seed(4), Seed(5)),
            BracketSlot::Semifinal1 => (Seed(1), WinnerOf(BracketSlot::Quarterfinal1)),
            BracketSlot::Semifinal2 => (Seed(2), WinnerOf(BracketSlot::Quarterfinal2)),
            BracketSlot::Final => (WinnerOf(BracketSlot::Semifinal1), WinnerOf(BracketSlot::Semifinal2)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotSource {
    Seed(usize),
    WinnerOf(BracketSlot),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketEntry {
    pub slot: BracketSlot,
    pub match_id: MatchId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayoffBracket {
    /// Qualified teams in seed order.
    pub seeds: Vec<TeamId>,
    pub entries: Vec<BracketEntry>,
}

impl PlayoffBracket {
    /// Create the bracket and its five matches. `anchor` is the date of the last
    /// regular-season match; rounds follow at +7, +14 and +21 days.
    pub fn build(
        seeds: &[TeamId],
        anchor: NaiveDate,
        best_of: u8,
        ids: &mut MatchIdSequence,
    ) -> Result<(Self, Vec<Match>)> {
        if seeds.len() != PLAYOFF_TEAMS {
            return Err(SimError::PlayoffSeeding { expected: PLAYOFF_TEAMS, found: seeds.len() });
        }

        let mut entries = Vec::with_capacity(BracketSlot::ALL.len());
        let mut matches = Vec::with_capacity(BracketSlot::ALL.len());
        for slot in BracketSlot::ALL {
            let (home, away) = slot.sources();
            let seed_of = |source: SlotSource| match source {
                SlotSource::Seed(seed) => Some(seeds[seed - 1]),
                SlotSource::WinnerOf(_) => None,
            };
            let date = anchor + Duration::days(slot.round().offset_days());
            let id = ids.next_id();
            matches.push(Match::pending(id, seed_of(home), seed_of(away), date, best_of));
            entries.push(BracketEntry { slot, match_id: id });
        }

        Ok((Self { seeds: seeds.to_vec(), entries }, matches))
    }

    pub fn match_id(&self, slot: BracketSlot) -> Option<MatchId> {
        self.entries.iter().find(|e| e.slot == slot).map(|e| e.match_id)
    }

    pub fn slot_of(&self, id: MatchId) -> Option<BracketSlot> {
        self.entries.iter().find(|e| e.match_id == id).map(|e| e.slot)
    }

    pub fn round_of(&self, id: MatchId) -> Option<PlayoffRound> {
        self.slot_of(id).map(|slot| slot.round())
    }

    fn winner_of(&self, slot: BracketSlot, matches: &[Match]) -> Option<TeamId> {
        let id = self.match_id(slot)?;
        matches.iter().find(|m| m.id == id).and_then(|m| m.winner())
    }

    /// Fill every open position whose feeder match has been resolved. Returns how many
    /// positions were filled.
    pub fn advance(&self, matches: &mut [Match]) -> usize {
        let mut filled = 0;
        for entry in &self.entries {
            let (home_source, away_source) = entry.slot.sources();
            let home_winner = match home_source {
                SlotSource::WinnerOf(feeder) => self.winner_of(feeder, matches),
                SlotSource::Seed(_) => None,
            };
            let away_winner = match away_source {
                SlotSource::WinnerOf(feeder) => self.winner_of(feeder, matches),
                SlotSource::Seed(_) => None,
            };

            let Some(target) = matches.iter_mut().find(|m| m.id == entry.match_id) else {
                continue;
            };
            if target.home.is_none() && home_winner.is_some() {
                target.home = home_winner;
                filled += 1;
            }
            if target.away.is_none() && away_winner.is_some() {
                target.away = away_winner;
                filled += 1;
            }
        }
        if filled > 0 {
            debug!(filled, "playoff bracket advanced");
        }
        filled
    }

    /// Winner of the final, once it has been played.
    pub fn champion(&self, matches: &[Match]) -> Option<TeamId> {
        self.winner_of(BracketSlot::Final, matches)
    }
}

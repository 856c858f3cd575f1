//! Turn-based ban/pick protocol.
//!
//! Ban1 (6) → Pick1 (6) → Ban2 (4) → Pick2 (4) → complete. The side to act is a pure
//! function of the phase and the actions recorded so far. Illegal actions return a
//! [`DraftError`] and leave the state untouched.

pub mod ai;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::DraftError;
use crate::models::{Champion, ChampionCatalogue, ChampionId, Role, Side, TeamId};

pub use ai::{auto_complete, force_action, DraftAction, DraftStrategy, RandomDrafter, TierListDrafter};

pub const BANS_PER_DRAFT: usize = 10;
pub const PICKS_PER_DRAFT: usize = 10;

const PICK1_ORDER: [Side; 6] = [Side::Blue, Side::Red, Side::Red, Side::Blue, Side::Blue, Side::Red];
const BAN2_ORDER: [Side; 4] = [Side::Red, Side::Red, Side::Blue, Side::Blue];
const PICK2_ORDER: [Side; 4] = [Side::Red, Side::Blue, Side::Red, Side::Blue];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DraftPhase {
    BanPhase1,
    PickPhase1,
    BanPhase2,
    PickPhase2,
}

impl DraftPhase {
    pub fn is_ban(&self) -> bool {
        matches!(self, DraftPhase::BanPhase1 | DraftPhase::BanPhase2)
    }

    pub fn is_pick(&self) -> bool {
        !self.is_ban()
    }

    pub fn label(&self) -> &'static str {
        match self {
            DraftPhase::BanPhase1 => "First Ban Phase",
            DraftPhase::PickPhase1 => "First Pick Phase",
            DraftPhase::BanPhase2 => "Second Ban Phase",
            DraftPhase::PickPhase2 => "Second Pick Phase",
        }
    }
}

/// Per-draft availability of a champion. The catalogue itself never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChampionStatus {
    Available,
    Banned(Side),
    Picked(Side),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pick {
    pub champion: ChampionId,
    pub side: Side,
    pub team: TeamId,
    pub role: Role,
    /// 1-based within the side (1..=5).
    pub number: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ban {
    pub champion: ChampionId,
    pub side: Side,
    pub team: TeamId,
    /// 1-based within the side: 1..=3 in the first ban phase, 4..=5 in the second.
    pub number: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftState {
    pub blue: TeamId,
    pub red: TeamId,
    /// `None` once all twenty actions are recorded.
    pub phase: Option<DraftPhase>,
    pub picks: Vec<Pick>,
    pub bans: Vec<Ban>,
    status: BTreeMap<ChampionId, ChampionStatus>,
}

impl DraftState {
    pub fn new(blue: TeamId, red: TeamId) -> Self {
        Self {
            blue,
            red,
            phase: Some(DraftPhase::BanPhase1),
            picks: Vec::new(),
            bans: Vec::new(),
            status: BTreeMap::new(),
        }
    }

    pub fn team_of(&self, side: Side) -> TeamId {
        match side {
            Side::Blue => self.blue,
            Side::Red => self.red,
        }
    }

    pub fn side_of(&self, team: TeamId) -> Option<Side> {
        if team == self.blue {
            Some(Side::Blue)
        } else if team == self.red {
            Some(Side::Red)
        } else {
            None
        }
    }

    pub fn is_complete(&self) -> bool {
        self.phase.is_none()
    }

    pub fn status(&self, champion: ChampionId) -> ChampionStatus {
        self.status.get(&champion).copied().unwrap_or(ChampionStatus::Available)
    }

    pub fn is_available(&self, champion: ChampionId) -> bool {
        self.status(champion) == ChampionStatus::Available
    }

    fn bans_by(&self, side: Side) -> usize {
        self.bans.iter().filter(|b| b.side == side).count()
    }

    pub fn picks_by(&self, side: Side) -> impl Iterator<Item = &Pick> {
        self.picks.iter().filter(move |p| p.side == side)
    }

    /// Side whose turn it is, `None` when the draft is complete.
    pub fn current_side(&self) -> Option<Side> {
        let side = match self.phase? {
            DraftPhase::BanPhase1 => {
                if self.bans_by(Side::Blue) == self.bans_by(Side::Red) {
                    Side::Blue
                } else {
                    Side::Red
                }
            }
            DraftPhase::PickPhase1 => PICK1_ORDER[self.picks.len().min(5)],
            DraftPhase::BanPhase2 => BAN2_ORDER[self.bans.len().saturating_sub(6).min(3)],
            DraftPhase::PickPhase2 => PICK2_ORDER[self.picks.len().saturating_sub(6).min(3)],
        };
        Some(side)
    }

    /// First role in declaration order that `side` has not picked yet.
    pub fn next_role_to_fill(&self, side: Side) -> Option<Role> {
        Role::ALL
            .into_iter()
            .find(|role| !self.picks_by(side).any(|p| p.role == *role))
    }

    fn check_turn(&self, side: Side) -> Result<DraftPhase, DraftError> {
        let phase = self.phase.ok_or(DraftError::DraftComplete)?;
        let expected = self.current_side().ok_or(DraftError::DraftComplete)?;
        if expected != side {
            return Err(DraftError::NotYourTurn { expected, attempted: side });
        }
        Ok(phase)
    }

    /// Validate a pick, returning the role it would fill.
    pub fn check_pick(
        &self,
        catalogue: &ChampionCatalogue,
        champion: ChampionId,
        side: Side,
    ) -> Result<Role, DraftError> {
        let entry = catalogue
            .get(champion)
            .ok_or_else(|| DraftError::UnknownChampion(format!("#{}", champion.0)))?;
        if !self.is_available(champion) {
            return Err(DraftError::ChampionUnavailable(champion));
        }
        let phase = self.check_turn(side)?;
        if !phase.is_pick() {
            return Err(DraftError::WrongPhase("pick"));
        }
        let role = self.next_role_to_fill(side).ok_or(DraftError::RolesFilled(side))?;
        if !entry.can_play(role) {
            return Err(DraftError::RoleMismatch { champion, role });
        }
        Ok(role)
    }

    pub fn check_ban(
        &self,
        catalogue: &ChampionCatalogue,
        champion: ChampionId,
        side: Side,
    ) -> Result<(), DraftError> {
        if catalogue.get(champion).is_none() {
            return Err(DraftError::UnknownChampion(format!("#{}", champion.0)));
        }
        if !self.is_available(champion) {
            return Err(DraftError::ChampionUnavailable(champion));
        }
        let phase = self.check_turn(side)?;
        if !phase.is_ban() {
            return Err(DraftError::WrongPhase("ban"));
        }
        Ok(())
    }

    pub fn is_legal_pick(&self, catalogue: &ChampionCatalogue, champion: ChampionId, side: Side) -> bool {
        self.check_pick(catalogue, champion, side).is_ok()
    }

    pub fn is_legal_ban(&self, catalogue: &ChampionCatalogue, champion: ChampionId, side: Side) -> bool {
        self.check_ban(catalogue, champion, side).is_ok()
    }

    pub fn apply_pick(
        &mut self,
        catalogue: &ChampionCatalogue,
        champion: ChampionId,
        side: Side,
    ) -> Result<(), DraftError> {
        let role = self.check_pick(catalogue, champion, side)?;
        let number = self.picks_by(side).count() as u8 + 1;
        self.picks.push(Pick { champion, side, team: self.team_of(side), role, number });
        self.status.insert(champion, ChampionStatus::Picked(side));
        debug!(side = ?side, champion = catalogue.name(champion), role = role.label(), number, "pick");

        self.phase = match (self.phase, self.picks.len()) {
            (Some(DraftPhase::PickPhase1), 6) => Some(DraftPhase::BanPhase2),
            (Some(DraftPhase::PickPhase2), PICKS_PER_DRAFT) => None,
            (phase, _) => phase,
        };
        Ok(())
    }

    pub fn apply_ban(
        &mut self,
        catalogue: &ChampionCatalogue,
        champion: ChampionId,
        side: Side,
    ) -> Result<(), DraftError> {
        self.check_ban(catalogue, champion, side)?;
        let number = self.bans_by(side) as u8 + 1;
        self.bans.push(Ban { champion, side, team: self.team_of(side), number });
        self.status.insert(champion, ChampionStatus::Banned(side));
        debug!(side = ?side, champion = catalogue.name(champion), number, "ban");

        self.phase = match (self.phase, self.bans.len()) {
            (Some(DraftPhase::BanPhase1), 6) => Some(DraftPhase::PickPhase1),
            (Some(DraftPhase::BanPhase2), BANS_PER_DRAFT) => Some(DraftPhase::PickPhase2),
            (phase, _) => phase,
        };
        Ok(())
    }

    /// Champions not yet banned or picked, filtered by case-insensitive name substring
    /// and optionally by role.
    pub fn available_champions<'a>(
        &self,
        catalogue: &'a ChampionCatalogue,
        filter: &str,
        role: Option<Role>,
    ) -> Vec<&'a Champion> {
        let needle = filter.to_lowercase();
        catalogue
            .iter()
            .filter(|c| self.is_available(c.id))
            .filter(|c| needle.is_empty() || c.name.to_lowercase().contains(&needle))
            .filter(|c| role.map_or(true, |r| c.can_play(r)))
            .collect()
    }

    /// Champion drafted by `side` for `role`.
    pub fn pick_for(&self, side: Side, role: Role) -> Option<&Pick> {
        self.picks_by(side).find(|p| p.role == role)
    }
}

pub mod champion;
pub mod events;
pub mod fixture;
pub mod match_result;
pub mod player;
pub mod registry;
pub mod team;

use serde::{Deserialize, Serialize};

pub use champion::{Champion, ChampionCatalogue};
pub use events::{
    DragonState, DragonType, EventKind, FightResult, MatchEvent, MultiKill, ObjectiveKind,
    ObjectiveTrade,
};
pub use fixture::{Match, MatchStatus};
pub use match_result::{MatchResult, PlayerMatchStats, TeamMatchStats};
pub use player::{Player, PlayerAttributes, PlayerKey};
pub use registry::{Competitor, Lineup, Registry};
pub use team::{SeasonRecord, Team, TeamKey, TitleKind};

/// Opaque arena handle for a [`Team`] inside a [`Registry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamId(pub u32);

/// Opaque arena handle for a [`Player`] inside a [`Registry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

/// Index of a champion inside a [`ChampionCatalogue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChampionId(pub u16);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MatchId(pub u32);

/// Monotonic id source for matches created by one owner (league or tournament).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchIdSequence {
    next: u32,
}

impl MatchIdSequence {
    pub fn next_id(&mut self) -> MatchId {
        let id = MatchId(self.next);
        self.next += 1;
        id
    }
}

/// The five competitive positions. Declaration order is the order roles are filled in a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    Top,
    Jungle,
    Mid,
    #[serde(rename = "ADC")]
    Adc,
    Support,
}

impl Role {
    pub const ALL: [Role; 5] = [Role::Top, Role::Jungle, Role::Mid, Role::Adc, Role::Support];

    pub fn label(&self) -> &'static str {
        match self {
            Role::Top => "Top",
            Role::Jungle => "Jungle",
            Role::Mid => "Mid",
            Role::Adc => "ADC",
            Role::Support => "Support",
        }
    }
}

/// Drafting position in a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    Blue,
    Red,
}

impl Side {
    pub fn opposite(&self) -> Side {
        match self {
            Side::Blue => Side::Red,
            Side::Red => Side::Blue,
        }
    }
}

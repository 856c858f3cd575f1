use thiserror::Error;

use crate::models::{ChampionId, MatchId, Role, Side, TeamId};

/// Illegal draft action. The draft state is never touched when one of these is returned,
/// so callers can retry or substitute a fallback choice.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    #[error("draft is already complete")]
    DraftComplete,

    #[error("not {attempted:?}'s turn, {expected:?} is acting")]
    NotYourTurn { expected: Side, attempted: Side },

    #[error("current phase does not allow a {0}")]
    WrongPhase(&'static str),

    #[error("champion {0:?} is already banned or picked")]
    ChampionUnavailable(ChampionId),

    #[error("champion {champion:?} cannot fill {role:?}")]
    RoleMismatch { champion: ChampionId, role: Role },

    #[error("side {0:?} has already filled every role")]
    RolesFilled(Side),

    #[error("unknown champion: {0}")]
    UnknownChampion(String),

    #[error("no legal champion left for {0:?}")]
    NoLegalChoice(Side),
}

/// Fatal precondition failures of a simulation operation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("best_of must be 1, 3 or 5, got {0}")]
    InvalidBestOf(u8),

    #[error("draft must be completed before simulating the match ({picks} picks, {bans} bans)")]
    IncompleteDraft { picks: usize, bans: usize },

    #[error("team {team} has no player for role {role:?}")]
    MissingRoster { team: String, role: Role },

    #[error("expected {expected} playoff teams, found {found}")]
    PlayoffSeeding { expected: usize, found: usize },

    #[error("league must have at least 4 teams total, found {0}")]
    LeagueTooSmall(usize),

    #[error("operation requires phase {expected}, current phase is {actual}")]
    WrongPhase { expected: &'static str, actual: String },

    #[error("match {0:?} is not resolved")]
    UnresolvedMatch(MatchId),

    #[error("match {0:?} has no opponent assigned yet")]
    UnassignedSlot(MatchId),

    #[error("unknown team {0:?}")]
    UnknownTeam(TeamId),

    #[error("unknown match {0:?}")]
    UnknownMatch(MatchId),

    #[error("unknown division: {0}")]
    UnknownDivision(String),

    #[error("unknown league: {0}")]
    UnknownLeague(String),

    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    #[error("cannot split {teams} teams into {groups} equal groups")]
    GroupConfig { teams: usize, groups: usize },

    #[error("knockout field of {0} teams is not a power of two")]
    BracketSize(usize),

    #[error("draft failed: {0}")]
    Draft(#[from] DraftError),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl SimError {
    pub(crate) fn wrong_phase(expected: &'static str, actual: impl std::fmt::Debug) -> Self {
        SimError::WrongPhase { expected, actual: format!("{actual:?}") }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported config extension: {0}")]
    UnsupportedFormat(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl From<ConfigError> for SimError {
    fn from(err: ConfigError) -> Self {
        SimError::Config(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no stored {kind} with key {key}")]
    NotFound { kind: &'static str, key: String },

    #[error("store version mismatch: found {found}, expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, SimError>;

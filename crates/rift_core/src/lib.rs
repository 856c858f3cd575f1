//! # rift_core - Deterministic Esports Season Simulation
//!
//! Champion draft, best-of series simulation, regional leagues with playoffs and an
//! international tournament, all driven by a caller-supplied random source.
//!
//! ## Features
//! - Same seed, same season: no hidden global randomness
//! - Draft state machine with AI drafters for auto-completion
//! - Round-robin scheduling, tiebroken standings and a six-team playoff bracket
//! - Group stage plus knockout tournaments with placement rewards
//! - Localised play-by-play narratives
//! - A weekly world tick with a date-driven tournament calendar

// Simulation entry points take the registry, draft, both lineups, format and rng
#![allow(clippy::too_many_arguments)]
#![allow(clippy::field_reassign_with_default)]
#![allow(clippy::needless_range_loop)]

pub mod config;
pub mod data;
pub mod draft;
pub mod error;
pub mod league;
pub mod models;
pub mod narrative;
pub mod rng;
pub mod sim;
pub mod store;
pub mod tournament;
pub mod world;

pub use config::SimConfig;
pub use draft::{DraftPhase, DraftState, DraftStrategy, RandomDrafter, TierListDrafter};
pub use error::{ConfigError, DraftError, Result, SimError, StoreError};
pub use league::{League, PlayoffBracket, Season, SeasonPhase, Split, TeamStanding};
pub use models::{
    ChampionCatalogue, Match, MatchId, MatchResult, Player, PlayerId, Registry, Role, Side, Team,
    TeamId,
};
pub use narrative::Narrator;
pub use rng::{derive_seed, seeded, SimRng};
pub use sim::Simulator;
pub use store::{JsonStore, Store};
pub use tournament::{Tournament, TournamentPhase, TournamentStats};
pub use world::{FinancialOverview, StepReport, TeamPerformance, World};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

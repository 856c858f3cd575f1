//! Persistence seam.
//!
//! The simulation never touches storage itself. Callers that need to keep teams, players,
//! matches or leagues between runs go through [`Store`]. [`JsonStore`] keeps every record as
//! a JSON value in memory and can be dumped to or restored from any reader/writer.

use std::collections::BTreeMap;
use std::io::{Read, Write};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::league::League;
use crate::models::{Match, MatchId, Player, PlayerId, Registry, Team, TeamId};

pub const STORE_VERSION: u32 = 1;

pub trait Store {
    fn load_team(&self, id: TeamId) -> Result<Team, StoreError>;
    fn save_team(&mut self, id: TeamId, team: &Team) -> Result<(), StoreError>;

    fn load_player(&self, id: PlayerId) -> Result<Player, StoreError>;
    fn save_player(&mut self, id: PlayerId, player: &Player) -> Result<(), StoreError>;

    fn load_match(&self, id: MatchId) -> Result<Match, StoreError>;
    fn save_match(&mut self, fixture: &Match) -> Result<(), StoreError>;

    fn load_league(&self, name: &str) -> Result<League, StoreError>;
    fn save_league(&mut self, league: &League) -> Result<(), StoreError>;

    /// Load a whole registry. Key indices are rebuilt before returning.
    fn load_registry(&self) -> Result<Registry, StoreError>;
    fn save_registry(&mut self, registry: &Registry) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JsonStore {
    entries: BTreeMap<String, serde_json::Value>,
}

#[derive(Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    entries: BTreeMap<String, serde_json::Value>,
}

impl JsonStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn put<T: Serialize>(&mut self, key: String, value: &T) -> Result<(), StoreError> {
        debug!(%key, "store write");
        self.entries.insert(key, serde_json::to_value(value)?);
        Ok(())
    }

    fn get<T: DeserializeOwned>(&self, kind: &'static str, key: String) -> Result<T, StoreError> {
        let value = self.entries.get(&key).ok_or(StoreError::NotFound { kind, key })?;
        Ok(T::deserialize(value)?)
    }

    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), StoreError> {
        let snapshot = Snapshot { version: STORE_VERSION, entries: self.entries.clone() };
        serde_json::to_writer_pretty(writer, &snapshot)?;
        info!(entries = self.entries.len(), "store written");
        Ok(())
    }

    pub fn read_from<R: Read>(reader: R) -> Result<Self, StoreError> {
        let snapshot: Snapshot = serde_json::from_reader(reader)?;
        if snapshot.version != STORE_VERSION {
            return Err(StoreError::VersionMismatch { found: snapshot.version, expected: STORE_VERSION });
        }
        info!(entries = snapshot.entries.len(), "store loaded");
        Ok(Self { entries: snapshot.entries })
    }
}

impl Store for JsonStore {
    fn load_team(&self, id: TeamId) -> Result<Team, StoreError> {
        self.get("team", format!("team/{}", id.0))
    }

    fn save_team(&mut self, id: TeamId, team: &Team) -> Result<(), StoreError> {
        self.put(format!("team/{}", id.0), team)
    }

    fn load_player(&self, id: PlayerId) -> Result<Player, StoreError> {
        self.get("player", format!("player/{}", id.0))
    }

    fn save_player(&mut self, id: PlayerId, player: &Player) -> Result<(), StoreError> {
        self.put(format!("player/{}", id.0), player)
    }

    fn load_match(&self, id: MatchId) -> Result<Match, StoreError> {
        self.get("match", format!("match/{}", id.0))
    }

    fn save_match(&mut self, fixture: &Match) -> Result<(), StoreError> {
        self.put(format!("match/{}", fixture.id.0), fixture)
    }

    fn load_league(&self, name: &str) -> Result<League, StoreError> {
        self.get("league", format!("league/{name}"))
    }

    fn save_league(&mut self, league: &League) -> Result<(), StoreError> {
        self.put(format!("league/{}", league.name), league)
    }

    fn load_registry(&self) -> Result<Registry, StoreError> {
        let mut registry: Registry = self.get("registry", "registry".to_string())?;
        registry.reindex();
        Ok(registry)
    }

    fn save_registry(&mut self, registry: &Registry) -> Result<(), StoreError> {
        self.put("registry".to_string(), registry)
    }
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{ChampionId, Role};
use crate::data::champions::STANDARD_POOL;
use crate::error::DraftError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Champion {
    pub id: ChampionId,
    pub name: String,
    pub roles: Vec<Role>,
}

impl Champion {
    pub fn can_play(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// Immutable champion pool shared by every draft.
///
/// Ids are assigned in insertion order, so catalogues built from the same entry list
/// agree on ids.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChampionCatalogue {
    champions: Vec<Champion>,
    #[serde(skip)]
    by_name: BTreeMap<String, ChampionId>,
}

impl ChampionCatalogue {
    /// Build a catalogue from `(name, roles)` pairs. Later duplicates of a name are ignored.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<Role>)>,
        S: Into<String>,
    {
        let mut catalogue = Self::default();
        for (name, roles) in entries {
            let name = name.into();
            if catalogue.by_name.contains_key(&name) {
                continue;
            }
            let id = ChampionId(catalogue.champions.len() as u16);
            catalogue.by_name.insert(name.clone(), id);
            catalogue.champions.push(Champion { id, name, roles });
        }
        catalogue
    }

    /// The built-in competitive pool.
    pub fn standard() -> Self {
        Self::from_entries(STANDARD_POOL.iter().map(|(name, roles)| (*name, roles.to_vec())))
    }

    /// Rebuild the name index after deserialization.
    pub fn reindex(&mut self) {
        self.by_name = self.champions.iter().map(|c| (c.name.clone(), c.id)).collect();
    }

    pub fn get(&self, id: ChampionId) -> Option<&Champion> {
        self.champions.get(id.0 as usize)
    }

    pub fn id_of(&self, name: &str) -> Option<ChampionId> {
        self.by_name.get(name).copied()
    }

    pub fn by_name(&self, name: &str) -> Option<&Champion> {
        self.id_of(name).and_then(|id| self.get(id))
    }

    /// Resolve a name, failing with [`DraftError::UnknownChampion`].
    pub fn resolve(&self, name: &str) -> Result<ChampionId, DraftError> {
        self.id_of(name).ok_or_else(|| DraftError::UnknownChampion(name.to_string()))
    }

    pub fn name(&self, id: ChampionId) -> &str {
        self.get(id).map(|c| c.name.as_str()).unwrap_or("Unknown")
    }

    pub fn iter(&self) -> impl Iterator<Item = &Champion> {
        self.champions.iter()
    }

    pub fn len(&self) -> usize {
        self.champions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.champions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_pool_covers_every_role() {
        let catalogue = ChampionCatalogue::standard();
        assert!(catalogue.len() > 100);
        for role in Role::ALL {
            let count = catalogue.iter().filter(|c| c.can_play(role)).count();
            assert!(count >= 10, "{role:?} has only {count} champions");
        }
    }

    #[test]
    fn test_lookup_by_name() {
        let catalogue = ChampionCatalogue::standard();
        let jayce = catalogue.by_name("Jayce").unwrap();
        assert!(jayce.can_play(Role::Top));
        assert!(jayce.can_play(Role::Mid));
        assert!(!jayce.can_play(Role::Support));
        assert_eq!(catalogue.get(jayce.id).unwrap().name, "Jayce");
        assert!(matches!(
            catalogue.resolve("Not A Champion"),
            Err(DraftError::UnknownChampion(_))
        ));
    }

    #[test]
    fn test_duplicates_are_ignored() {
        let catalogue = ChampionCatalogue::from_entries(vec![
            ("Ahri", vec![Role::Mid]),
            ("Ahri", vec![Role::Top]),
            ("Thresh", vec![Role::Support]),
        ]);
        assert_eq!(catalogue.len(), 2);
        assert_eq!(catalogue.by_name("Ahri").unwrap().roles, vec![Role::Mid]);
        assert_eq!(catalogue.id_of("Thresh"), Some(ChampionId(1)));
    }

    #[test]
    fn test_reindex_after_deserialize() {
        let catalogue = ChampionCatalogue::standard();
        let json = serde_json::to_string(&catalogue).unwrap();
        let mut restored: ChampionCatalogue = serde_json::from_str(&json).unwrap();
        assert!(restored.id_of("Ahri").is_none());
        restored.reindex();
        assert_eq!(restored.id_of("Ahri"), catalogue.id_of("Ahri"));
    }
}

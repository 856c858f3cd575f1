//! Simulation tunables.
//!
//! Every constant the league, playoff and tournament flows read lives here so a season can
//! be re-run with a different format without touching code.
//!
//! ```rust
//! use rift_core::config::SimConfig;
//!
//! let config = SimConfig::default();
//! let quick = SimConfig::quick();
//! assert_eq!(quick.series.playoffs, 1);
//! ```

use std::path::Path;
use std::{env, fs};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const CONFIG_PATH_ENV: &str = "RIFT_SIM_CONFIG";

/// Series lengths per competition stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesConfig {
    pub regular_season: u8,
    pub playoffs: u8,
    pub group_stage: u8,
    pub knockout: u8,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self { regular_season: 1, playoffs: 5, group_stage: 1, knockout: 5 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Championship points for winning a playoff match.
    pub playoff_win_points: u32,
    /// Championship points for losing a playoff match.
    pub playoff_loss_points: u32,
    pub domestic_title_points: u32,
    pub international_title_points: u32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            playoff_win_points: 50,
            playoff_loss_points: 20,
            domestic_title_points: 100,
            international_title_points: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentConfig {
    pub groups: usize,
    pub teams_per_league: usize,
    pub prize_pool: u64,
    /// Championship points by placement: winner, runner-up, semifinalist,
    /// quarterfinalist, group stage only.
    pub placement_points: [u32; 5],
    /// Share of the prize pool per team: winner, runner-up, each semifinalist,
    /// each quarterfinalist.
    pub prize_shares: [f64; 4],
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            groups: 4,
            teams_per_league: 4,
            prize_pool: 1_000_000,
            placement_points: [100, 70, 40, 20, 10],
            prize_shares: [0.50, 0.25, 0.10, 0.0125],
        }
    }
}

impl TournamentConfig {
    /// Teams entering the knockout bracket (top two of each group).
    pub fn knockout_field(&self) -> usize {
        self.groups * 2
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrativeConfig {
    /// BCP-47 tag, negotiated against the bundled locales.
    pub locale: String,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self { locale: "en-US".to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SimConfig {
    pub series: SeriesConfig,
    pub rewards: RewardConfig,
    pub tournament: TournamentConfig,
    pub narrative: NarrativeConfig,
}

impl SimConfig {
    /// Standard competitive format.
    pub fn standard() -> Self {
        Self::default()
    }

    /// Single-game series everywhere. Useful for fast previews.
    pub fn quick() -> Self {
        let mut cfg = Self::default();
        cfg.series = SeriesConfig { regular_season: 1, playoffs: 1, group_stage: 1, knockout: 1 };
        cfg
    }

    /// Best-of-three regular season and groups, as in international events.
    pub fn international() -> Self {
        let mut cfg = Self::default();
        cfg.series.regular_season = 3;
        cfg.series.group_stage = 3;
        cfg
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_yaml::from_str(content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from a `.yaml`/`.yml` or `.json` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            Some("json") => Self::from_json_str(&content),
            other => Err(ConfigError::UnsupportedFormat(other.unwrap_or("").to_string())),
        }
    }

    /// Load from the file named by `RIFT_SIM_CONFIG`. `Ok(None)` when the variable is unset
    /// or blank.
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        let Ok(path) = env::var(CONFIG_PATH_ENV) else {
            return Ok(None);
        };
        let path = path.trim();
        if path.is_empty() {
            return Ok(None);
        }
        Self::load(path).map(Some)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let series = [
            ("regular_season", self.series.regular_season),
            ("playoffs", self.series.playoffs),
            ("group_stage", self.series.group_stage),
            ("knockout", self.series.knockout),
        ];
        for (name, best_of) in series {
            if !matches!(best_of, 1 | 3 | 5) {
                return Err(ConfigError::Invalid(format!(
                    "series.{name} must be 1, 3 or 5, got {best_of}"
                )));
            }
        }

        let t = &self.tournament;
        if t.groups == 0 || t.groups % 2 != 0 {
            return Err(ConfigError::Invalid(format!(
                "tournament.groups must be a positive even number, got {}",
                t.groups
            )));
        }
        if !t.knockout_field().is_power_of_two() {
            return Err(ConfigError::Invalid(format!(
                "knockout field of {} teams is not a power of two",
                t.knockout_field()
            )));
        }
        if t.teams_per_league == 0 {
            return Err(ConfigError::Invalid("tournament.teams_per_league must be positive".into()));
        }

        let [winner, runner_up, semi, quarter] = t.prize_shares;
        if t.prize_shares.iter().any(|s| *s < 0.0) {
            return Err(ConfigError::Invalid("prize shares cannot be negative".into()));
        }
        let total = winner + runner_up + semi * 2.0 + quarter * 4.0;
        if total > 1.0 + 1e-9 {
            return Err(ConfigError::Invalid(format!(
                "prize shares add up to {:.2}% of the pool",
                total * 100.0
            )));
        }
        Ok(())
    }
}

// ========== Tests ==========

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let cfg = SimConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.series.regular_season, 1);
        assert_eq!(cfg.series.playoffs, 5);
        assert_eq!(cfg.rewards.playoff_win_points, 50);
        assert_eq!(cfg.tournament.knockout_field(), 8);
        assert_eq!(cfg.narrative.locale, "en-US");
    }

    #[test]
    fn test_presets() {
        assert_eq!(SimConfig::quick().series.knockout, 1);
        assert_eq!(SimConfig::international().series.group_stage, 3);
        SimConfig::quick().validate().unwrap();
        SimConfig::international().validate().unwrap();
    }

    #[test]
    fn test_invalid_best_of_rejected() {
        let mut cfg = SimConfig::default();
        cfg.series.playoffs = 4;
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_group_count_rules() {
        let mut cfg = SimConfig::default();
        cfg.tournament.groups = 3;
        assert!(cfg.validate().is_err());
        cfg.tournament.groups = 6;
        assert!(cfg.validate().is_err());
        cfg.tournament.groups = 2;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_prize_shares_capped() {
        let mut cfg = SimConfig::default();
        cfg.tournament.prize_shares = [0.6, 0.3, 0.1, 0.0];
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let cfg = SimConfig::from_yaml_str("series:\n  playoffs: 3\nnarrative:\n  locale: ko-KR\n").unwrap();
        assert_eq!(cfg.series.playoffs, 3);
        assert_eq!(cfg.series.knockout, 5);
        assert_eq!(cfg.narrative.locale, "ko-KR");
        assert_eq!(cfg.tournament.groups, 4);
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("sim.json");
        let mut file = fs::File::create(&json_path).unwrap();
        write!(file, r#"{{"rewards": {{"playoff_win_points": 75}}}}"#).unwrap();
        let cfg = SimConfig::load(&json_path).unwrap();
        assert_eq!(cfg.rewards.playoff_win_points, 75);

        let toml_path = dir.path().join("sim.toml");
        fs::write(&toml_path, "x = 1").unwrap();
        assert!(matches!(SimConfig::load(&toml_path), Err(ConfigError::UnsupportedFormat(_))));

        let missing = dir.path().join("missing.yaml");
        assert!(matches!(SimConfig::load(missing), Err(ConfigError::Io(_))));
    }
}

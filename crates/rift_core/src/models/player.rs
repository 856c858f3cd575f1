use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Role, TeamId};

/// Business identity of a player. Two players with the same name and role are the same
/// player regardless of where they are stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerKey {
    pub name: String,
    pub role: Role,
}

/// Skill attributes, each on a 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerAttributes {
    pub mechanical_skill: u8,
    pub game_knowledge: u8,
    pub communication: u8,
    pub leadership: u8,
}

impl PlayerAttributes {
    /// Values above 100 are clamped.
    pub fn new(mechanical_skill: u8, game_knowledge: u8, communication: u8, leadership: u8) -> Self {
        Self {
            mechanical_skill: mechanical_skill.min(100),
            game_knowledge: game_knowledge.min(100),
            communication: communication.min(100),
            leadership: leadership.min(100),
        }
    }

    /// Weighted overall rating: 35% mechanics, 35% knowledge, 15% communication, 15% leadership.
    /// Rounded to two decimals.
    pub fn overall_rating(&self) -> f64 {
        let rating = self.mechanical_skill as f64 * 0.35
            + self.game_knowledge as f64 * 0.35
            + self.communication as f64 * 0.15
            + self.leadership as f64 * 0.15;
        (rating * 100.0).round() / 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub role: Role,
    pub attributes: PlayerAttributes,
    pub nationality: String,
    pub salary: u32,
    pub contract_end: NaiveDate,
    /// Owning team, set by the registry when the player joins a roster.
    #[serde(default)]
    pub team: Option<TeamId>,
    #[serde(default)]
    pub games_played: u32,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
}

impl Player {
    pub fn new(
        name: impl Into<String>,
        role: Role,
        attributes: PlayerAttributes,
        nationality: impl Into<String>,
        salary: u32,
        contract_end: NaiveDate,
    ) -> Self {
        Self {
            name: name.into(),
            role,
            attributes,
            nationality: nationality.into(),
            salary,
            contract_end,
            team: None,
            games_played: 0,
            wins: 0,
            losses: 0,
        }
    }

    pub fn key(&self) -> PlayerKey {
        PlayerKey { name: self.name.clone(), role: self.role }
    }

    pub fn overall_rating(&self) -> f64 {
        self.attributes.overall_rating()
    }

    /// Win rate in percent.
    pub fn win_rate(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.wins as f64 / self.games_played as f64 * 100.0
    }

    pub fn record_game(&mut self, won: bool) {
        self.games_played += 1;
        if won {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
    }

    pub fn is_contract_expired(&self, today: NaiveDate) -> bool {
        today >= self.contract_end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_player() -> Player {
        Player::new(
            "Faker",
            Role::Mid,
            PlayerAttributes::new(95, 98, 90, 95),
            "South Korea",
            1_000_000,
            NaiveDate::from_ymd_opt(2025, 11, 30).unwrap(),
        )
    }

    #[test]
    fn test_overall_rating_weights() {
        let attrs = PlayerAttributes::new(80, 80, 60, 40);
        // 28 + 28 + 9 + 6
        assert!((attrs.overall_rating() - 71.0).abs() < 1e-9);

        let attrs = PlayerAttributes::new(95, 98, 90, 95);
        assert!((attrs.overall_rating() - 95.05).abs() < 1e-9);
    }

    #[test]
    fn test_attributes_are_clamped() {
        let attrs = PlayerAttributes::new(150, 100, 101, 0);
        assert_eq!(attrs.mechanical_skill, 100);
        assert_eq!(attrs.communication, 100);
        assert_eq!(attrs.leadership, 0);
    }

    #[test]
    fn test_record_game_and_win_rate() {
        let mut player = sample_player();
        assert_eq!(player.win_rate(), 0.0);

        player.record_game(true);
        player.record_game(true);
        player.record_game(false);
        player.record_game(true);

        assert_eq!(player.games_played, 4);
        assert_eq!(player.wins, 3);
        assert_eq!(player.losses, 1);
        assert!((player.win_rate() - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_contract_expiry() {
        let player = sample_player();
        assert!(!player.is_contract_expired(NaiveDate::from_ymd_opt(2025, 11, 29).unwrap()));
        assert!(player.is_contract_expired(NaiveDate::from_ymd_opt(2025, 11, 30).unwrap()));
    }

    #[test]
    fn test_identity_is_name_and_role() {
        let a = sample_player();
        let mut b = sample_player();
        b.salary = 1;
        b.attributes = PlayerAttributes::new(1, 1, 1, 1);
        assert_eq!(a.key(), b.key());

        b.role = Role::Top;
        assert_ne!(a.key(), b.key());
    }
}

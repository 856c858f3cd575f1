use std::collections::HashMap;

use once_cell::sync::Lazy;
use rand::Rng;

use super::composition::composition_score;
use crate::draft::DraftState;
use crate::models::{ChampionCatalogue, Competitor, Lineup, Registry, Side};

/// Champion pairs that amplify each other.
static SYNERGIES: Lazy<HashMap<&'static str, &'static [&'static str]>> = Lazy::new(|| {
    HashMap::from([
        ("Yasuo", &["Malphite", "Diana", "Gragas"][..]),
        ("Kalista", &["Thresh", "Nautilus", "Leona"][..]),
        ("Twitch", &["Lulu", "Yuumi"][..]),
        ("Master Yi", &["Taric", "Kayle"][..]),
    ])
});

const SYNERGY_PER_PAIR: f64 = 10.0;
const SYNERGY_CAP: f64 = 50.0;

/// Team synergy term in [0, 50]: 10 per known synergy pair drafted together.
pub fn team_synergy(champions: &[&str]) -> f64 {
    let pairs = champions
        .iter()
        .filter_map(|name| SYNERGIES.get(name))
        .map(|partners| champions.iter().filter(|c| partners.contains(*c)).count())
        .sum::<usize>();
    (pairs as f64 * SYNERGY_PER_PAIR).min(SYNERGY_CAP)
}

/// Performance score of one competitor for a single series.
///
/// Rostered players score their weighted rating plus `synergy * 0.2` and ±5 noise;
/// placeholders draw uniformly from 60-80.
pub fn performance<R: Rng>(
    registry: &Registry,
    competitor: Competitor,
    synergy: f64,
    rng: &mut R,
) -> f64 {
    let rating = match competitor {
        Competitor::Real(id) => registry.player(id).map(|p| p.overall_rating()),
        Competitor::Placeholder(_) => None,
    };
    match rating {
        Some(base) => base + synergy * 0.2 + rng.gen_range(-5.0..=5.0),
        None => rng.gen_range(60.0..=80.0),
    }
}

/// 70% average performance of the five drafted competitors, 30% composition score.
/// Returns 0.0 for a side with no picks.
pub fn team_strength<R: Rng>(
    registry: &Registry,
    catalogue: &ChampionCatalogue,
    draft: &DraftState,
    side: Side,
    lineup: &Lineup,
    rng: &mut R,
) -> f64 {
    let picks: Vec<_> = draft.picks_by(side).collect();
    if picks.is_empty() {
        return 0.0;
    }
    let champions: Vec<&str> = picks.iter().map(|p| catalogue.name(p.champion)).collect();
    let synergy = team_synergy(&champions);

    let total: f64 = picks
        .iter()
        .map(|pick| performance(registry, lineup.get(pick.role), synergy, &mut *rng))
        .sum();
    let base = total / 5.0;

    base * 0.7 + composition_score(&champions) * 0.3
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Player, PlayerAttributes, Role, Team, TeamId};
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_synergy_pairs() {
        assert_eq!(team_synergy(&["Yasuo", "Malphite", "Jinx"]), 10.0);
        assert_eq!(team_synergy(&["Yasuo", "Diana", "Twitch", "Lulu", "Malphite"]), 30.0);
        assert_eq!(team_synergy(&["Ahri"]), 0.0);
    }

    #[test]
    fn test_performance_ranges() {
        let mut registry = Registry::new();
        let team = registry.add_team(Team::new("T1", "LCK", 0)).unwrap();
        let faker = registry
            .add_player(
                team,
                Player::new(
                    "Faker",
                    Role::Mid,
                    PlayerAttributes::new(90, 90, 90, 90),
                    "KR",
                    0,
                    NaiveDate::from_ymd_opt(2027, 1, 1).unwrap(),
                ),
            )
            .unwrap();

        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..200 {
            let real = performance(&registry, Competitor::Real(faker), 10.0, &mut rng);
            assert!((87.0..=97.0).contains(&real), "{real}");

            let stand_in = performance(&registry, Competitor::Placeholder(Role::Top), 0.0, &mut rng);
            assert!((60.0..=80.0).contains(&stand_in), "{stand_in}");
        }
    }

    #[test]
    fn test_strength_without_picks_is_zero() {
        let registry = Registry::new();
        let catalogue = ChampionCatalogue::standard();
        let draft = DraftState::new(TeamId(0), TeamId(1));
        let lineup = Lineup::placeholder(TeamId(0));
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(team_strength(&registry, &catalogue, &draft, Side::Blue, &lineup, &mut rng), 0.0);
    }
}

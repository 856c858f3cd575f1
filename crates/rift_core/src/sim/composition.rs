//! Table-driven composition analysis. Four sub-scores of 25 points each; the total is 0-100.

use std::collections::HashSet;

use once_cell::sync::Lazy;

fn table(names: &[&'static str]) -> HashSet<&'static str> {
    names.iter().copied().collect()
}

static PHYSICAL_DAMAGE: Lazy<HashSet<&str>> = Lazy::new(|| {
    table(&["Ashe", "Caitlyn", "Jinx", "Lucian", "Tristana", "Zed", "Yasuo", "Yone", "Talon"])
});
static MAGIC_DAMAGE: Lazy<HashSet<&str>> = Lazy::new(|| {
    table(&["Ahri", "Annie", "Brand", "Lux", "Syndra", "Viktor", "Veigar", "Kassadin"])
});

static HIGH_CC: Lazy<HashSet<&str>> =
    Lazy::new(|| table(&["Leona", "Nautilus", "Thresh", "Morgana", "Lux", "Malphite"]));
static MEDIUM_CC: Lazy<HashSet<&str>> =
    Lazy::new(|| table(&["Ahri", "Annie", "Ashe", "Jhin", "Sett"]));

static STRONG_ENGAGE: Lazy<HashSet<&str>> =
    Lazy::new(|| table(&["Malphite", "Leona", "Nautilus", "Hecarim", "Sejuani"]));
static MEDIUM_ENGAGE: Lazy<HashSet<&str>> =
    Lazy::new(|| table(&["Thresh", "Rakan", "Sett", "Gragas"]));

/// Archetypes a composition can win through.
static WIN_CONDITIONS: Lazy<[HashSet<&str>; 5]> = Lazy::new(|| {
    [
        table(&["Malphite", "Orianna", "Miss Fortune", "Leona", "Amumu"]),
        table(&["Thresh", "Blitzcrank", "Ahri", "Pyke", "Morgana"]),
        table(&["Fiora", "Jax", "Tryndamere", "Yorick", "Nasus"]),
        table(&["Ziggs", "Xerath", "Jayce", "Nidalee", "Varus"]),
        table(&["Kayle", "Kassadin", "Vayne", "Veigar", "Vladimir"]),
    ]
});

static EARLY_GAME: Lazy<HashSet<&str>> =
    Lazy::new(|| table(&["Lee Sin", "Pantheon", "Draven", "Renekton"]));
static MID_GAME: Lazy<HashSet<&str>> =
    Lazy::new(|| table(&["Orianna", "Viktor", "Syndra", "Riven"]));
static LATE_GAME: Lazy<HashSet<&str>> =
    Lazy::new(|| table(&["Kayle", "Kassadin", "Vayne", "Vladimir"]));

/// 25 for two or more of each damage type, 15 for at least one of each, otherwise 5.
pub fn damage_balance(champions: &[&str]) -> f64 {
    let mut physical = 0;
    let mut magic = 0;
    for name in champions {
        if PHYSICAL_DAMAGE.contains(name) {
            physical += 1;
        } else if MAGIC_DAMAGE.contains(name) {
            magic += 1;
        }
    }
    if physical >= 2 && magic >= 2 {
        25.0
    } else if physical >= 1 && magic >= 1 {
        15.0
    } else {
        5.0
    }
}

fn tiered(champions: &[&str], strong: &HashSet<&str>, medium: &HashSet<&str>) -> f64 {
    let score: f64 = champions
        .iter()
        .map(|name| {
            if strong.contains(name) {
                2.5
            } else if medium.contains(name) {
                1.5
            } else {
                0.0
            }
        })
        .sum();
    score.min(12.5)
}

/// Crowd control potential, capped at 12.5.
pub fn crowd_control(champions: &[&str]) -> f64 {
    tiered(champions, &HIGH_CC, &MEDIUM_CC)
}

/// Engage potential, capped at 12.5.
pub fn engage(champions: &[&str]) -> f64 {
    tiered(champions, &STRONG_ENGAGE, &MEDIUM_ENGAGE)
}

/// 8 points per archetype present, capped at 25.
pub fn win_conditions(champions: &[&str]) -> f64 {
    let present = WIN_CONDITIONS
        .iter()
        .filter(|archetype| champions.iter().any(|name| archetype.contains(name)))
        .count();
    (present as f64 * 8.0).min(25.0)
}

pub fn power_curve(champions: &[&str]) -> f64 {
    let (mut early, mut mid, mut late) = (0, 0, 0);
    for name in champions {
        if EARLY_GAME.contains(name) {
            early += 1;
        } else if MID_GAME.contains(name) {
            mid += 1;
        } else if LATE_GAME.contains(name) {
            late += 1;
        }
    }

    if early > 0 && mid > 0 && late > 0 {
        25.0
    } else if (early > 0 && mid > 0) || (mid > 0 && late > 0) {
        20.0
    } else if early >= 3 || mid >= 3 || late >= 3 {
        15.0
    } else {
        10.0
    }
}

/// Composition score in [0, 100] for a drafted five.
pub fn composition_score(champions: &[&str]) -> f64 {
    damage_balance(champions)
        + (crowd_control(champions) + engage(champions)) / 2.0
        + win_conditions(champions)
        + power_curve(champions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_balance_tiers() {
        assert_eq!(damage_balance(&["Jinx", "Zed", "Ahri", "Lux", "Thresh"]), 25.0);
        assert_eq!(damage_balance(&["Jinx", "Ahri", "Thresh", "Jax", "Vi"]), 15.0);
        assert_eq!(damage_balance(&["Jinx", "Caitlyn", "Zed", "Jax", "Vi"]), 5.0);
    }

    #[test]
    fn test_cc_and_engage_are_capped() {
        let tanks = ["Leona", "Nautilus", "Thresh", "Morgana", "Malphite", "Lux"];
        assert_eq!(crowd_control(&tanks), 12.5);
        assert_eq!(crowd_control(&["Ahri", "Sett"]), 3.0);
        assert_eq!(engage(&["Malphite", "Thresh"]), 4.0);
        assert_eq!(engage(&["Jinx"]), 0.0);
    }

    #[test]
    fn test_win_conditions() {
        assert_eq!(win_conditions(&["Aatrox"]), 0.0);
        assert_eq!(win_conditions(&["Malphite", "Thresh"]), 16.0);
        assert_eq!(win_conditions(&["Malphite", "Thresh", "Fiora", "Jayce"]), 25.0);
    }

    #[test]
    fn test_power_curve() {
        assert_eq!(power_curve(&["Lee Sin", "Orianna", "Vayne"]), 25.0);
        assert_eq!(power_curve(&["Orianna", "Kayle"]), 20.0);
        assert_eq!(power_curve(&["Lee Sin", "Viktor"]), 20.0);
        assert_eq!(power_curve(&["Lee Sin", "Draven", "Renekton"]), 15.0);
        // Early plus late without a mid-game anchor scores as unclear.
        assert_eq!(power_curve(&["Lee Sin", "Vayne"]), 10.0);
    }

    #[test]
    fn test_composition_score_bounds() {
        let best = ["Malphite", "Lee Sin", "Orianna", "Vayne", "Thresh"];
        let score = composition_score(&best);
        assert!(score > 50.0 && score <= 100.0, "score {score}");

        let empty: [&str; 0] = [];
        // 5 damage + 0 teamfight + 0 win conditions + 10 power curve
        assert_eq!(composition_score(&empty), 15.0);
    }
}

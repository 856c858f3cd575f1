//! Seeded demo world: four regional leagues of fictional teams with full rosters.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::error::Result;
use crate::league::League;
use crate::models::{Player, PlayerAttributes, Registry, Role, Team, TeamId};

pub const DEFAULT_TEAMS_PER_LEAGUE: usize = 10;

/// Chance that a team carries a substitute for a given role.
const BACKUP_CHANCE: f64 = 0.3;

pub struct Region {
    pub code: &'static str,
    /// Mean attribute level of the region's players.
    pub skill: i32,
    pub nationalities: &'static [&'static str],
}

pub const REGIONS: [Region; 4] = [
    Region { code: "LCK", skill: 72, nationalities: &["KR"] },
    Region { code: "LPL", skill: 71, nationalities: &["CN", "CN", "CN", "KR"] },
    Region { code: "LEC", skill: 66, nationalities: &["DE", "FR", "ES", "DK", "PL", "SE", "KR"] },
    Region { code: "LCS", skill: 63, nationalities: &["US", "US", "CA", "KR", "DK"] },
];

const TEAM_PREFIXES: &[&str] = &[
    "Iron", "Crimson", "Silent", "Golden", "Storm", "Azure", "Shadow", "Solar", "Frost", "Ember",
    "Night", "Jade", "Thunder", "Royal",
];

const TEAM_SUFFIXES: &[&str] = &[
    "Wolves", "Dragons", "Titans", "Falcons", "Phoenix", "Knights", "Serpents", "Lions", "Ravens",
    "Tigers", "Sentinels", "Owls",
];

const SYLLABLES: &[&str] = &[
    "ka", "ri", "zen", "mo", "lux", "ta", "vi", "ro", "sa", "kel", "dan", "yu", "fe", "no", "ix",
    "ba", "shi", "tor", "el", "qu",
];

pub struct DemoWorld {
    pub registry: Registry,
    pub leagues: Vec<League>,
}

/// Build one league per region with `teams_per_league` teams each.
pub fn generate<R: Rng>(teams_per_league: usize, rng: &mut R) -> Result<DemoWorld> {
    let mut registry = Registry::new();
    let mut handles = BTreeSet::new();
    let mut leagues = Vec::with_capacity(REGIONS.len());

    for region in &REGIONS {
        let mut names: Vec<String> = TEAM_PREFIXES
            .iter()
            .flat_map(|prefix| TEAM_SUFFIXES.iter().map(move |suffix| format!("{prefix} {suffix}")))
            .collect();
        names.shuffle(rng);

        let mut teams = Vec::with_capacity(teams_per_league);
        for name in names.into_iter().take(teams_per_league) {
            let budget = rng.gen_range(2_000_000..=6_000_000);
            let id = registry.add_team(Team::new(name, region.code, budget))?;
            build_roster(&mut registry, id, region, &mut handles, rng)?;
            teams.push(id);
        }
        leagues.push(League::with_teams(region.code, teams)?);
        debug!(region = region.code, teams = teams_per_league, "demo league generated");
    }

    Ok(DemoWorld { registry, leagues })
}

fn build_roster<R: Rng>(
    registry: &mut Registry,
    team: TeamId,
    region: &Region,
    handles: &mut BTreeSet<String>,
    rng: &mut R,
) -> Result<()> {
    let team_level = region.skill + rng.gen_range(-8..=8);
    for role in Role::ALL {
        let starter = random_player(role, team_level, region, handles, rng);
        registry.add_player(team, starter)?;
        if rng.gen_bool(BACKUP_CHANCE) {
            let backup = random_player(role, team_level - 8, region, handles, rng);
            registry.add_player(team, backup)?;
        }
    }
    Ok(())
}

fn random_player<R: Rng>(
    role: Role,
    level: i32,
    region: &Region,
    handles: &mut BTreeSet<String>,
    rng: &mut R,
) -> Player {
    let mut attribute = || (level + rng.gen_range(-10..=10)).clamp(35, 99) as u8;
    let attributes = PlayerAttributes::new(attribute(), attribute(), attribute(), attribute());

    let name = unique_handle(handles, rng);
    let nationality = region.nationalities.choose(rng).copied().unwrap_or("KR");
    let salary = (attributes.overall_rating() * 1_500.0).round() as u32;
    let contract_end = NaiveDate::from_ymd_opt(2025 + rng.gen_range(1..=3), 11, 30).unwrap_or_default();

    Player::new(name, role, attributes, nationality, salary, contract_end)
}

fn unique_handle<R: Rng>(handles: &mut BTreeSet<String>, rng: &mut R) -> String {
    loop {
        let parts = rng.gen_range(2..=3);
        let raw: String = (0..parts).filter_map(|_| SYLLABLES.choose(rng).copied()).collect();
        let mut chars = raw.chars();
        let handle = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
            None => continue,
        };
        let handle = if handles.contains(&handle) { format!("{handle}{}", handles.len()) } else { handle };
        if handles.insert(handle.clone()) {
            return handle;
        }
    }
}

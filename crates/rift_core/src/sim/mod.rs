//! Series simulation.
//!
//! A [`Simulator`] turns a completed draft and two lineups into a [`MatchResult`]:
//! team strength decides a per-game win probability, the series is drawn game by game,
//! then stats, objectives and the play-by-play are sampled for the result.

pub mod composition;
pub mod events;
pub mod strength;

use std::sync::Arc;

use chrono::NaiveDate;
use rand::Rng;
use tracing::{debug, warn};

pub use composition::composition_score;
pub use events::{generate_events, EventContext, GameNarrative};
pub use strength::{performance, team_strength, team_synergy};

use crate::config::SimConfig;
use crate::draft::{auto_complete, DraftState, RandomDrafter};
use crate::error::{Result, SimError};
use crate::models::{
    ChampionCatalogue, Competitor, Lineup, Match, MatchResult, MatchStatus, PlayerId,
    PlayerMatchStats, Registry, Role, Side, TeamMatchStats,
};
use crate::narrative::Narrator;

pub struct Simulator {
    catalogue: Arc<ChampionCatalogue>,
    narrator: Narrator,
    config: SimConfig,
}

impl std::fmt::Debug for Simulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulator")
            .field("champions", &self.catalogue.len())
            .field("locale", &self.narrator.locale())
            .finish()
    }
}

impl Simulator {
    pub fn new(catalogue: Arc<ChampionCatalogue>, config: SimConfig) -> Self {
        let narrator = Narrator::new(&config.narrative.locale);
        Self { catalogue, narrator, config }
    }

    pub fn catalogue(&self) -> &ChampionCatalogue {
        &self.catalogue
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn narrator(&self) -> &Narrator {
        &self.narrator
    }

    /// Resolve a best-of-`best_of` series from a completed draft.
    ///
    /// Strength is computed once per side and the same per-game probability is used for
    /// every game. `blue` and `red` must be the lineups of the draft's blue and red teams.
    #[allow(clippy::too_many_arguments)]
    pub fn simulate_series<R: Rng>(
        &self,
        registry: &Registry,
        draft: &DraftState,
        blue: &Lineup,
        red: &Lineup,
        best_of: u8,
        date: NaiveDate,
        rng: &mut R,
    ) -> Result<MatchResult> {
        if !matches!(best_of, 1 | 3 | 5) {
            return Err(SimError::InvalidBestOf(best_of));
        }
        if !draft.is_complete() {
            return Err(SimError::IncompleteDraft { picks: draft.picks.len(), bans: draft.bans.len() });
        }

        let blue_strength = team_strength(registry, &self.catalogue, draft, Side::Blue, blue, rng);
        let red_strength = team_strength(registry, &self.catalogue, draft, Side::Red, red, rng);
        let total = blue_strength + red_strength;
        let blue_chance = if total > 0.0 { blue_strength / total } else { 0.5 };

        let games_to_win = best_of.div_ceil(2);
        let (mut blue_wins, mut red_wins) = (0u8, 0u8);
        while blue_wins < games_to_win && red_wins < games_to_win {
            if rng.gen::<f64>() < blue_chance {
                blue_wins += 1;
            } else {
                red_wins += 1;
            }
        }

        let (winner, loser, winner_score, loser_score, winner_chance) = if blue_wins > red_wins {
            (blue, red, blue_wins, red_wins, blue_chance)
        } else {
            (red, blue, red_wins, blue_wins, 1.0 - blue_chance)
        };
        let games = (winner_score + loser_score) as u32;

        let mut winner_stats = team_stats(winner, true, games, rng);
        let mut loser_stats = team_stats(loser, false, games, rng);

        winner_stats.towers = rng.gen_range(8..=11) * games;
        winner_stats.inhibitors = rng.gen_range(2..=3) * games;
        winner_stats.barons = rng.gen_range(1..=2) * games;
        winner_stats.dragons = rng.gen_range(3..=4) * games;
        loser_stats.towers = rng.gen_range(2..=5) * games;
        loser_stats.inhibitors = rng.gen_range(0..=2) * games;
        loser_stats.barons = rng.gen_range(0..=1) * games;
        loser_stats.dragons = rng.gen_range(0..=2) * games;

        let duration = rng.gen_range(25..=45u32) * games;

        let ctx = EventContext { registry, narrator: &self.narrator, winner, loser };
        let narrative = generate_events(&ctx, rng);
        winner_stats.dragon_state = narrative.winner_dragons;
        loser_stats.dragon_state = narrative.loser_dragons;

        let mvp = select_mvp(&winner_stats, &loser_stats);

        debug!(
            winner = registry.team_name(winner.team),
            loser = registry.team_name(loser.team),
            score = %format!("{winner_score}-{loser_score}"),
            p = winner_chance,
            "series simulated"
        );

        Ok(MatchResult {
            winner: winner.team,
            loser: loser.team,
            winner_score,
            loser_score,
            date,
            duration,
            winner_stats,
            loser_stats,
            events: narrative.events,
            mvp,
            winner_game_probability: winner_chance,
        })
    }

    /// Draft (if needed), simulate and record a scheduled match.
    ///
    /// Missing or partial drafts are finished by [`RandomDrafter`]; the home team takes blue
    /// side when no draft was started. Both teams need a full starting lineup.
    pub fn play_match<R: Rng>(
        &self,
        registry: &mut Registry,
        fixture: &mut Match,
        rng: &mut R,
    ) -> Result<MatchResult> {
        if fixture.is_resolved() {
            return Err(SimError::wrong_phase("unresolved match", MatchStatus::Resolved));
        }
        let (home, away) = fixture.teams()?;
        let home_lineup = registry.starting_lineup(home)?;
        let away_lineup = registry.starting_lineup(away)?;

        if fixture.draft.is_none() {
            fixture.start_draft(true)?;
        }
        let Some(draft) = fixture.draft.as_mut() else {
            return Err(SimError::IncompleteDraft { picks: 0, bans: 0 });
        };
        if !draft.is_complete() {
            if !draft.picks.is_empty() || !draft.bans.is_empty() {
                warn!(match_id = fixture.id.0, "finishing a partial draft automatically");
            }
            auto_complete(draft, &self.catalogue, &RandomDrafter, &mut *rng)?;
        }

        let (blue, red) = if draft.blue == home {
            (&home_lineup, &away_lineup)
        } else {
            (&away_lineup, &home_lineup)
        };
        let result = self.simulate_series(registry, draft, blue, red, fixture.best_of, fixture.date, rng)?;

        registry.record_result(&result)?;
        fixture.result = Some(result.clone());
        Ok(result)
    }
}

fn player_stats<R: Rng>(competitor: Competitor, role: Role, won: bool, rng: &mut R) -> PlayerMatchStats {
    let pick = |rng: &mut R, win: (u32, u32), lose: (u32, u32)| {
        let (lo, hi) = if won { win } else { lose };
        rng.gen_range(lo..=hi)
    };
    PlayerMatchStats {
        competitor,
        role,
        kills: pick(rng, (2, 8), (0, 4)),
        deaths: pick(rng, (0, 4), (2, 6)),
        assists: pick(rng, (4, 12), (2, 8)),
        cs: pick(rng, (180, 300), (150, 250)),
        vision_score: rng.gen_range(20..=40),
        damage_dealt: pick(rng, (15_000, 35_000), (10_000, 25_000)),
        gold_earned: pick(rng, (8_000, 15_000), (6_000, 12_000)),
    }
}

/// Sample one game's worth of stats per starter and scale by `games`.
fn team_stats<R: Rng>(lineup: &Lineup, won: bool, games: u32, rng: &mut R) -> TeamMatchStats {
    let players = Role::ALL
        .iter()
        .map(|role| player_stats(lineup.get(*role), *role, won, rng).scaled(games))
        .collect();
    TeamMatchStats::from_players(lineup.team, players)
}

/// The rostered player with the best `10 * KDA + damage / 1000 + vision / 2` across both
/// sides. Ties keep the first player seen, winners before losers. `None` when every
/// competitor is a placeholder.
pub fn select_mvp(winner: &TeamMatchStats, loser: &TeamMatchStats) -> Option<PlayerId> {
    winner
        .players
        .iter()
        .chain(loser.players.iter())
        .filter_map(|line| line.competitor.player_id().map(|id| (id, line.mvp_score())))
        .fold(None, |best: Option<(PlayerId, f64)>, (id, score)| match best {
            Some((_, top)) if score <= top => best,
            _ => Some((id, score)),
        })
        .map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Player, PlayerAttributes, Team, TeamId};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use sha2::{Digest, Sha256};

    fn contract() -> NaiveDate {
        NaiveDate::from_ymd_opt(2027, 11, 30).unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    fn add_team(registry: &mut Registry, name: &str, skill: u8) -> TeamId {
        let team = registry.add_team(Team::new(name, "LCK", 1_000_000)).unwrap();
        for role in Role::ALL {
            let attrs = PlayerAttributes::new(skill, skill, skill, skill);
            let player = Player::new(format!("{name} {}", role.label()), role, attrs, "KR", 100_000, contract());
            registry.add_player(team, player).unwrap();
        }
        team
    }

    fn setup() -> (Simulator, Registry, TeamId, TeamId) {
        let mut registry = Registry::new();
        let a = add_team(&mut registry, "Alpha", 80);
        let b = add_team(&mut registry, "Bravo", 70);
        let sim = Simulator::new(Arc::new(ChampionCatalogue::standard()), SimConfig::default());
        (sim, registry, a, b)
    }

    fn drafted(sim: &Simulator, blue: TeamId, red: TeamId, rng: &mut ChaCha8Rng) -> DraftState {
        let mut draft = DraftState::new(blue, red);
        auto_complete(&mut draft, sim.catalogue(), &RandomDrafter, rng).unwrap();
        draft
    }

    #[test]
    fn test_series_scores_follow_best_of() {
        let (sim, registry, a, b) = setup();
        let blue = registry.starting_lineup(a).unwrap();
        let red = registry.starting_lineup(b).unwrap();

        for seed in 0..30 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let draft = drafted(&sim, a, b, &mut rng);
            for (best_of, wins) in [(1u8, 1u8), (3, 2), (5, 3)] {
                let result = sim
                    .simulate_series(&registry, &draft, &blue, &red, best_of, date(), &mut rng)
                    .unwrap();
                assert_eq!(result.winner_score, wins);
                assert!(result.loser_score < wins);
                assert_ne!(result.winner, result.loser);
                let games = result.games_played();
                assert!((25 * games..=45 * games).contains(&result.duration));
                assert!((8 * games..=11 * games).contains(&result.winner_stats.towers));
                assert_eq!(result.winner_stats.players.len(), 5);
                assert!(result.mvp.is_some());
            }
        }
    }

    #[test]
    fn test_preconditions() {
        let (sim, registry, a, b) = setup();
        let blue = registry.starting_lineup(a).unwrap();
        let red = registry.starting_lineup(b).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let empty = DraftState::new(a, b);
        assert_eq!(
            sim.simulate_series(&registry, &empty, &blue, &red, 1, date(), &mut rng).unwrap_err(),
            SimError::IncompleteDraft { picks: 0, bans: 0 }
        );

        let draft = drafted(&sim, a, b, &mut rng);
        assert_eq!(
            sim.simulate_series(&registry, &draft, &blue, &red, 2, date(), &mut rng).unwrap_err(),
            SimError::InvalidBestOf(2)
        );
    }

    #[test]
    fn test_same_seed_same_bytes() {
        let (sim, registry, a, b) = setup();
        let blue = registry.starting_lineup(a).unwrap();
        let red = registry.starting_lineup(b).unwrap();

        let run = || {
            let mut rng = ChaCha8Rng::seed_from_u64(2024);
            let draft = drafted(&sim, a, b, &mut rng);
            let result = sim.simulate_series(&registry, &draft, &blue, &red, 5, date(), &mut rng).unwrap();
            serde_json::to_vec(&result).unwrap()
        };
        let first = run();
        let second = run();
        assert_eq!(first, second);
        assert_eq!(Sha256::digest(&first), Sha256::digest(&second));
    }

    #[test]
    fn test_play_match_drafts_and_records() {
        let (sim, mut registry, a, b) = setup();
        let mut fixture = Match::new(crate::models::MatchId(0), a, b, date(), 3);
        let mut rng = ChaCha8Rng::seed_from_u64(9);

        let result = sim.play_match(&mut registry, &mut fixture, &mut rng).unwrap();
        assert_eq!(fixture.status(), MatchStatus::Resolved);
        assert!(fixture.draft.as_ref().unwrap().is_complete());
        assert_eq!(fixture.draft.as_ref().unwrap().blue, a);

        let winner = registry.team(result.winner).unwrap();
        let loser = registry.team(result.loser).unwrap();
        assert_eq!((winner.wins, winner.losses), (1, 0));
        assert_eq!((loser.wins, loser.losses), (0, 1));
        assert_eq!(winner.game_differential, result.game_diff_for(result.winner));

        let starter = winner.starter(Role::Mid).unwrap();
        assert_eq!(registry.player(starter).unwrap().games_played, 1);

        assert!(matches!(
            sim.play_match(&mut registry, &mut fixture, &mut rng),
            Err(SimError::WrongPhase { .. })
        ));
    }

    #[test]
    fn test_play_match_requires_full_roster() {
        let (sim, mut registry, a, _) = setup();
        let thin = registry.add_team(Team::new("Thin", "LEC", 0)).unwrap();
        let mut fixture = Match::new(crate::models::MatchId(1), a, thin, date(), 1);
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let err = sim.play_match(&mut registry, &mut fixture, &mut rng).unwrap_err();
        assert!(matches!(err, SimError::MissingRoster { .. }));
        assert!(fixture.draft.is_none());
    }

    #[test]
    fn test_mvp_ignores_placeholders_and_keeps_first_on_ties() {
        let line = |competitor, kills| PlayerMatchStats {
            competitor,
            role: Role::Mid,
            kills,
            deaths: 1,
            assists: 0,
            cs: 0,
            vision_score: 0,
            damage_dealt: 0,
            gold_earned: 0,
        };
        let winner = TeamMatchStats::from_players(
            TeamId(0),
            vec![line(Competitor::Placeholder(Role::Mid), 20), line(Competitor::Real(PlayerId(1)), 5)],
        );
        let loser = TeamMatchStats::from_players(TeamId(1), vec![line(Competitor::Real(PlayerId(2)), 5)]);
        assert_eq!(select_mvp(&winner, &loser), Some(PlayerId(1)));

        let ghosts = TeamMatchStats::from_players(TeamId(0), vec![line(Competitor::Placeholder(Role::Top), 9)]);
        assert_eq!(select_mvp(&ghosts, &ghosts), None);
    }
}

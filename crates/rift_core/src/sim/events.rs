//! Play-by-play narrative for a series.
//!
//! Events are a pure function of the RNG stream and the two lineups. Momentum is tracked
//! through fight kills: the side behind gets a comeback chance that grows from 30% to 50%
//! over the game.

use fluent::FluentArgs;
use rand::Rng;

use crate::models::{
    Competitor, DragonState, DragonType, EventKind, FightResult, Lineup, MatchEvent, MultiKill,
    ObjectiveKind, ObjectiveTrade, Registry, Role, TeamId,
};
use crate::narrative::Narrator;

const LOCATIONS: [&str; 11] = [
    "Baron pit",
    "Dragon pit",
    "top river",
    "bottom river",
    "top jungle",
    "bottom jungle",
    "mid lane",
    "top lane",
    "bottom lane",
    "enemy blue buff",
    "enemy red buff",
];
const TOWER_TIERS: [&str; 3] = ["outer", "inner", "inhibitor"];
const LANES: [&str; 3] = ["top", "mid", "bottom"];

/// Index of the series winner in [`Sides`]; the loser is `1 - WINNER`.
const WINNER: usize = 0;

pub struct EventContext<'a> {
    pub registry: &'a Registry,
    pub narrator: &'a Narrator,
    pub winner: &'a Lineup,
    pub loser: &'a Lineup,
}

#[derive(Debug, Clone)]
pub struct GameNarrative {
    pub events: Vec<MatchEvent>,
    pub winner_dragons: DragonState,
    pub loser_dragons: DragonState,
}

struct SideView {
    team: TeamId,
    name: String,
    members: Vec<(Role, Competitor, String)>,
}

impl SideView {
    fn new(registry: &Registry, lineup: &Lineup) -> Self {
        let members = Role::ALL
            .iter()
            .map(|role| {
                let competitor = lineup.get(*role);
                (*role, competitor, registry.competitor_name(competitor))
            })
            .collect();
        Self { team: lineup.team, name: registry.team_name(lineup.team).to_string(), members }
    }

    fn random_member<R: Rng>(&self, rng: &mut R) -> &(Role, Competitor, String) {
        &self.members[rng.gen_range(0..self.members.len())]
    }
}

type Sides = [SideView; 2];

fn pick<'a, R: Rng>(items: &[&'a str], rng: &mut R) -> &'a str {
    items[rng.gen_range(0..items.len())]
}

pub fn generate_events<R: Rng>(ctx: &EventContext<'_>, rng: &mut R) -> GameNarrative {
    let sides: Sides = [SideView::new(ctx.registry, ctx.winner), SideView::new(ctx.registry, ctx.loser)];
    let mut dragons = [DragonState::default(); 2];
    let mut events = Vec::new();

    let duration: u32 = rng.gen_range(25..=45);

    let first_blood = rng.gen_range(2..=10);
    let fb_side = if rng.gen::<f64>() < 0.7 { WINNER } else { 1 - WINNER };
    let (_, fb_player, fb_name) = sides[fb_side].random_member(rng).clone();
    let mut args = FluentArgs::new();
    args.set("player", fb_name);
    args.set("team", sides[fb_side].name.clone());
    events.push(MatchEvent {
        minute: first_blood,
        kind: EventKind::FirstBlood,
        description: ctx.narrator.format(EventKind::FirstBlood.message_id(), Some(&args)),
        player: fb_player.player_id(),
        team: Some(sides[fb_side].team),
        fight: None,
        trade: None,
    });

    let (mut leader, mut trailer) = (WINNER, 1 - WINNER);
    let (mut leader_kills, mut trailer_kills) = (0u32, 0u32);

    let count = rng.gen_range(8..=15);
    let mut last = first_blood;
    for _ in 0..count {
        let min = last + 1;
        let max = (last + 8).min(duration.saturating_sub(5)).max(min);
        let minute = if min >= max { min } else { rng.gen_range(min..=max) };
        last = minute;
        let comeback = 0.3 + minute as f64 / duration as f64 * 0.2;

        if rng.gen::<f64>() < 0.4 {
            let location = pick(&LOCATIONS, rng);
            let mut dragon = None;
            let objective = if rng.gen::<f64>() < 0.6 {
                if minute > 20 && rng.gen::<f64>() < 0.3 {
                    Some("Baron Nashor".to_string())
                } else {
                    let kind = DragonType::ALL[rng.gen_range(0..DragonType::ALL.len())];
                    dragon = Some(kind);
                    Some(format!("{} Dragon", kind.label()))
                }
            } else {
                None
            };

            let fight_winner = if rng.gen::<f64>() < comeback { trailer } else { leader };
            let (fight, description) =
                simulate_fight(ctx.narrator, &sides, fight_winner, location, objective, rng);

            if fight_winner == leader {
                leader_kills += fight.winner_kills;
            } else {
                trailer_kills += fight.winner_kills;
                if trailer_kills > leader_kills {
                    std::mem::swap(&mut leader, &mut trailer);
                    std::mem::swap(&mut leader_kills, &mut trailer_kills);
                }
            }
            if let Some(kind) = dragon {
                dragons[fight_winner].add_dragon(kind);
            }

            let kind = if fight_winner != WINNER {
                EventKind::ComebackFight
            } else if fight.was_ace() {
                EventKind::PerfectAce
            } else {
                EventKind::TeamFightWin
            };
            events.push(MatchEvent {
                minute,
                kind,
                description,
                player: None,
                team: Some(sides[fight_winner].team),
                fight: Some(fight),
                trade: None,
            });
        } else {
            let kind = EventKind::SKIRMISHES[rng.gen_range(0..EventKind::SKIRMISHES.len())];
            let side = if rng.gen::<f64>() < comeback { trailer } else { leader };
            let member = sides[side].random_member(rng).clone();
            let (description, dragon, trade) =
                describe_skirmish(ctx.narrator, &sides, side, kind, &member, rng);
            if let Some(kind) = dragon {
                dragons[side].add_dragon(kind);
            }
            events.push(MatchEvent {
                minute,
                kind,
                description,
                player: member.1.player_id(),
                team: Some(sides[side].team),
                fight: None,
                trade,
            });
        }
    }

    let [winner_dragons, loser_dragons] = dragons;
    GameNarrative { events, winner_dragons, loser_dragons }
}

fn simulate_fight<R: Rng>(
    narrator: &Narrator,
    sides: &Sides,
    winner: usize,
    location: &str,
    objective: Option<String>,
    rng: &mut R,
) -> (FightResult, String) {
    let loser = 1 - winner;
    let winner_kills: u32 = rng.gen_range(2..=5);
    let loser_kills: u32 = rng.gen_range(0..winner_kills);

    let mut candidates: Vec<&(Role, Competitor, String)> = sides[winner].members.iter().collect();
    if rng.gen::<f64>() >= 0.8 {
        candidates.extend(sides[loser].members.iter());
    }
    let mvp = candidates[rng.gen_range(0..candidates.len())].clone();

    let multi_kill = match MultiKill::from_kills(winner_kills) {
        Some(kind) if rng.gen::<f64>() < 0.7 => Some((sides[winner].random_member(rng).clone(), kind)),
        _ => None,
    };

    let fight = FightResult {
        winner: sides[winner].team,
        loser: sides[loser].team,
        winner_kills,
        loser_kills,
        location: location.to_string(),
        objective,
        mvp: mvp.1.player_id(),
        multi_kill: multi_kill
            .as_ref()
            .and_then(|((_, competitor, _), kind)| competitor.player_id().map(|id| (id, *kind))),
    };

    let mut parts = Vec::new();
    let mut args = FluentArgs::new();
    args.set("winner", sides[winner].name.clone());
    args.set("loser", sides[loser].name.clone());
    args.set("winner_kills", winner_kills);
    args.set("loser_kills", loser_kills);
    args.set("location", location.to_string());
    args.set("mvp", mvp.2.clone());
    if let Some(objective) = &fight.objective {
        args.set("objective", objective.clone());
    }

    if fight.was_ace() && winner_kills >= 3 {
        parts.push(narrator.format("fight-ace", Some(&args)));
    } else {
        parts.push(narrator.format("fight-score", Some(&args)));
    }
    parts.push(narrator.format("fight-location", Some(&args)));
    if fight.objective.is_some() {
        parts.push(narrator.format("fight-objective", Some(&args)));
    }
    if fight.was_ace() {
        parts.push(narrator.format("fight-mvp-ace", Some(&args)));
    } else {
        parts.push(narrator.format("fight-mvp", Some(&args)));
    }
    if let Some(((_, _, name), kind)) = &multi_kill {
        let mut multi = FluentArgs::new();
        multi.set("player", name.clone());
        multi.set("kill", format!("{kind:?}"));
        parts.push(narrator.format("fight-multikill", Some(&multi)));
    }

    (fight, parts.join(" "))
}

fn describe_skirmish<R: Rng>(
    narrator: &Narrator,
    sides: &Sides,
    side: usize,
    kind: EventKind,
    member: &(Role, Competitor, String),
    rng: &mut R,
) -> (String, Option<DragonType>, Option<ObjectiveTrade>) {
    let (role, _, name) = member;
    let mut args = FluentArgs::new();
    args.set("player", name.clone());
    args.set("team", sides[side].name.clone());
    args.set("role", role.label());
    let mut dragon = None;
    let mut trade = None;

    match kind {
        EventKind::SoloKill | EventKind::Outplay => {
            args.set("variant", rng.gen_range(0..3u32));
        }
        EventKind::ObjectiveSteal => {
            let epic = rng.gen::<f64>() < 0.3;
            let objective = if epic {
                pick(&["Baron", "Elder Dragon"], rng)
            } else {
                pick(&["Dragon", "Rift Herald"], rng)
            };
            args.set("epic", if epic { "yes" } else { "no" });
            args.set("objective", objective);
        }
        EventKind::TowerDestroyed => {
            args.set("tier", pick(&TOWER_TIERS, rng));
            args.set("lane", pick(&LANES, rng));
        }
        EventKind::DragonSecured => {
            let kind = DragonType::ALL[rng.gen_range(0..DragonType::ALL.len())];
            dragon = Some(kind);
            args.set("dragon", kind.label());
        }
        EventKind::BaronSecured => {
            args.set("minute", rng.gen_range(20..=35u32));
        }
        EventKind::InhibitorDestroyed => {
            args.set("lane", pick(&LANES, rng));
        }
        EventKind::JungleInvade | EventKind::CounterGank => {
            args.set("jungler", if *role == Role::Jungle { "yes" } else { "no" });
        }
        EventKind::ObjectiveTrade => {
            let other = 1 - side;
            let objectives = ObjectiveKind::ALL;
            let deal = ObjectiveTrade {
                team1: sides[side].team,
                team2: sides[other].team,
                team1_objective: objectives[rng.gen_range(0..objectives.len())],
                team2_objective: objectives[rng.gen_range(0..objectives.len())],
                team1_location: pick(&LOCATIONS, rng).to_string(),
                team2_location: pick(&LOCATIONS, rng).to_string(),
            };
            let describe = |objective: ObjectiveKind, location: &str| {
                let mut at = FluentArgs::new();
                let key = format!("objective-{}", objective.label().to_lowercase());
                at.set("objective", narrator.format(&key, None));
                at.set("location", location.to_string());
                narrator.format("objective-at", Some(&at))
            };
            args.set("team1", sides[side].name.clone());
            args.set("team2", sides[other].name.clone());
            args.set("objective1", describe(deal.team1_objective, &deal.team1_location));
            args.set("objective2", describe(deal.team2_objective, &deal.team2_location));
            let outcome = match deal.winner() {
                Some(team) if team == deal.team1 => "team1",
                Some(_) => "team2",
                None => "even",
            };
            args.set("outcome", outcome);
            trade = Some(deal);
        }
        _ => {}
    }

    (narrator.format(kind.message_id(), Some(&args)), dragon, trade)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn run(seed: u64) -> GameNarrative {
        let registry = Registry::new();
        let narrator = Narrator::default();
        let winner = Lineup::placeholder(TeamId(0));
        let loser = Lineup::placeholder(TeamId(1));
        let ctx = EventContext { registry: &registry, narrator: &narrator, winner: &winner, loser: &loser };
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        generate_events(&ctx, &mut rng)
    }

    #[test]
    fn test_event_stream_shape() {
        for seed in 0..50 {
            let narrative = run(seed);
            let events = &narrative.events;

            assert!((9..=16).contains(&events.len()), "{} events", events.len());
            assert_eq!(events[0].kind, EventKind::FirstBlood);
            assert!((2..=10).contains(&events[0].minute));
            for pair in events.windows(2) {
                assert!(pair[1].minute > pair[0].minute, "events must be strictly spaced");
            }
            for event in events {
                assert!(!event.description.starts_with('['), "untranslated: {}", event.description);
                assert!(event.team.is_some());
            }
        }
    }

    #[test]
    fn test_fight_events_carry_results() {
        let mut saw_fight = false;
        for seed in 0..20 {
            for event in run(seed).events {
                if let Some(fight) = &event.fight {
                    saw_fight = true;
                    assert!(event.kind.is_team_fight());
                    assert!((2..=5).contains(&fight.winner_kills));
                    assert!(fight.loser_kills < fight.winner_kills);
                    assert_eq!(Some(fight.winner), event.team);
                    if event.kind == EventKind::ComebackFight {
                        assert_eq!(fight.winner, TeamId(1));
                    }
                }
            }
        }
        assert!(saw_fight);
    }

    #[test]
    fn test_same_seed_same_story() {
        let a = run(99);
        let b = run(99);
        assert_eq!(a.events, b.events);
        assert_eq!(a.winner_dragons, b.winner_dragons);
    }
}

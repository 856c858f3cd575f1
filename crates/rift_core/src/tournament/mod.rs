//! International tournament: qualified teams from several leagues, a round-robin group
//! stage and a single-elimination knockout bracket.
//!
//! Knockout ties are numbered by round and position. The winner of tie `i` in round `r`
//! takes the home slot of tie `i / 2` in round `r + 1` when `i` is even and the away slot
//! otherwise. A next-round match is created as soon as its first feeder finishes.

pub mod rewards;

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub use rewards::{Finish, Placement};

use crate::config::SimConfig;
use crate::error::{Result, SimError};
use crate::league::League;
use crate::models::{Match, MatchId, MatchIdSequence, MatchResult, Registry, TeamId};
use crate::sim::Simulator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TournamentPhase {
    NotStarted,
    GroupStage,
    KnockoutStage,
    Finished,
}

impl TournamentPhase {
    pub fn label(&self) -> &'static str {
        match self {
            TournamentPhase::NotStarted => "Not Started",
            TournamentPhase::GroupStage => "Group Stage",
            TournamentPhase::KnockoutStage => "Knockout Stage",
            TournamentPhase::Finished => "Finished",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupEntry {
    pub team: TeamId,
    pub wins: u32,
    pub losses: u32,
    pub game_diff: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub teams: Vec<TeamId>,
    pub standings: Vec<GroupEntry>,
}

impl Group {
    fn new(name: String, teams: Vec<TeamId>) -> Self {
        let standings = teams
            .iter()
            .map(|team| GroupEntry { team: *team, wins: 0, losses: 0, game_diff: 0 })
            .collect();
        Self { name, teams, standings }
    }

    pub fn contains(&self, team: TeamId) -> bool {
        self.teams.contains(&team)
    }

    /// Standings by wins, then game differential. Ties keep draw order.
    pub fn ranked(&self) -> Vec<GroupEntry> {
        let mut rows = self.standings.clone();
        rows.sort_by(|a, b| b.wins.cmp(&a.wins).then(b.game_diff.cmp(&a.game_diff)));
        rows
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnockoutTie {
    pub round: u32,
    pub index: usize,
    pub match_id: MatchId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub name: String,
    pub start_date: NaiveDate,
    pub phase: TournamentPhase,
    pub teams: Vec<TeamId>,
    pub groups: Vec<Group>,
    pub group_matches: Vec<Match>,
    pub knockout_matches: Vec<Match>,
    pub ties: Vec<KnockoutTie>,
    pub winner: Option<TeamId>,
    group_best_of: u8,
    knockout_best_of: u8,
    rounds: u32,
    tallied: BTreeSet<MatchId>,
    rewards_paid: bool,
    match_ids: MatchIdSequence,
}

impl Tournament {
    pub fn new(name: impl Into<String>, start_date: NaiveDate, config: &SimConfig) -> Self {
        Self {
            name: name.into(),
            start_date,
            phase: TournamentPhase::NotStarted,
            teams: Vec::new(),
            groups: Vec::new(),
            group_matches: Vec::new(),
            knockout_matches: Vec::new(),
            ties: Vec::new(),
            winner: None,
            group_best_of: config.series.group_stage,
            knockout_best_of: config.series.knockout,
            rounds: 0,
            tallied: BTreeSet::new(),
            rewards_paid: false,
            match_ids: MatchIdSequence::default(),
        }
    }

    /// Draw the top teams of each league into groups and schedule the group stage.
    pub fn initialize<'a, R: Rng>(
        name: impl Into<String>,
        start_date: NaiveDate,
        leagues: impl IntoIterator<Item = &'a League>,
        registry: &Registry,
        config: &SimConfig,
        rng: &mut R,
    ) -> Result<Self> {
        let mut tournament = Self::new(name, start_date, config);
        let settings = &config.tournament;

        for league in leagues {
            let qualified = league.playoff_teams(registry)?;
            tournament.teams.extend(qualified.into_iter().take(settings.teams_per_league));
        }

        let (teams, groups) = (tournament.teams.len(), settings.groups);
        if groups == 0 || groups % 2 != 0 || teams % groups != 0 || teams / groups < 2 {
            return Err(SimError::GroupConfig { teams, groups });
        }
        let field = settings.knockout_field();
        if !field.is_power_of_two() {
            return Err(SimError::BracketSize(field));
        }
        tournament.rounds = field.trailing_zeros();

        let mut pool = tournament.teams.clone();
        pool.shuffle(rng);
        tournament.groups = pool
            .chunks(teams / groups)
            .zip(b'A'..)
            .map(|(members, letter)| Group::new(char::from(letter).to_string(), members.to_vec()))
            .collect();

        tournament.schedule_group_stage();
        tournament.phase = TournamentPhase::GroupStage;
        info!(tournament = %tournament.name, teams, groups, "tournament initialized");
        Ok(tournament)
    }

    /// Round-robin inside each group, one match per day across the whole stage.
    pub fn schedule_group_stage(&mut self) {
        self.group_matches.clear();
        let mut date = self.start_date;
        for group in &self.groups {
            for (i, home) in group.teams.iter().enumerate() {
                for away in &group.teams[i + 1..] {
                    let id = self.match_ids.next_id();
                    self.group_matches.push(Match::new(id, *home, *away, date, self.group_best_of));
                    date += Duration::days(1);
                }
            }
        }
    }

    fn require_phase(&self, expected: TournamentPhase) -> Result<()> {
        if self.phase != expected {
            return Err(SimError::wrong_phase(expected.label(), self.phase));
        }
        Ok(())
    }

    fn find_match(&self, id: MatchId) -> Option<&Match> {
        self.group_matches.iter().chain(self.knockout_matches.iter()).find(|m| m.id == id)
    }

    fn resolved(&self, id: MatchId) -> Result<&MatchResult> {
        self.find_match(id)
            .ok_or(SimError::UnknownMatch(id))?
            .result
            .as_ref()
            .ok_or(SimError::UnresolvedMatch(id))
    }

    /// Fold a finished group match into its group table. Repeated calls for the same match
    /// are ignored.
    pub fn update_group_standings(&mut self, match_id: MatchId) -> Result<()> {
        self.require_phase(TournamentPhase::GroupStage)?;
        if !self.group_matches.iter().any(|m| m.id == match_id) {
            return Err(SimError::UnknownMatch(match_id));
        }
        let result = self.resolved(match_id)?;
        let (winner, loser) = (result.winner, result.loser);
        let diff = result.winner_score as i32 - result.loser_score as i32;

        if self.tallied.contains(&match_id) {
            return Ok(());
        }
        let Some(group) = self.groups.iter_mut().find(|g| g.contains(winner) && g.contains(loser)) else {
            return Ok(());
        };
        for entry in group.standings.iter_mut() {
            if entry.team == winner {
                entry.wins += 1;
                entry.game_diff += diff;
            } else if entry.team == loser {
                entry.losses += 1;
                entry.game_diff -= diff;
            }
        }
        self.tallied.insert(match_id);
        Ok(())
    }

    /// Seed the opening knockout round from the top two of every group.
    ///
    /// Group winners face the runner-up of the neighbouring group (A1-B2, B1-A2, ...). The
    /// two ties of each group pair go to opposite halves of the bracket, so teams from the
    /// same group can only meet again in the final.
    pub fn start_knockout_stage(&mut self) -> Result<()> {
        self.require_phase(TournamentPhase::GroupStage)?;
        if let Some(open) = self.group_matches.iter().find(|m| !m.is_resolved()) {
            return Err(SimError::UnresolvedMatch(open.id));
        }

        let groups = self.groups.len();
        let misconfigured = || SimError::GroupConfig { teams: self.teams.len(), groups };
        if groups == 0 || groups % 2 != 0 {
            return Err(misconfigured());
        }
        let qualified = self
            .groups
            .iter()
            .map(|group| match group.ranked().get(0..2) {
                Some([first, second]) => Ok((first.team, second.team)),
                _ => Err(misconfigured()),
            })
            .collect::<Result<Vec<(TeamId, TeamId)>>>()?;

        let half = qualified.len() / 2;
        let mut pairings = vec![(TeamId(0), TeamId(0)); qualified.len()];
        for k in 0..half {
            let (first_a, second_a) = qualified[2 * k];
            let (first_b, second_b) = qualified[2 * k + 1];
            pairings[k] = (first_a, second_b);
            pairings[k + half] = (first_b, second_a);
        }

        let mut date = match self.group_matches.iter().map(|m| m.date).max() {
            Some(last) => last + Duration::days(2),
            None => self.start_date,
        };
        for (index, (home, away)) in pairings.into_iter().enumerate() {
            let id = self.match_ids.next_id();
            self.knockout_matches.push(Match::new(id, home, away, date, self.knockout_best_of));
            self.ties.push(KnockoutTie { round: 0, index, match_id: id });
            date += Duration::days(1);
        }

        self.phase = TournamentPhase::KnockoutStage;
        info!(tournament = %self.name, teams = qualified.len() * 2, "knockout stage started");
        Ok(())
    }

    /// Move the winner of a finished knockout match into the next round, or finish the
    /// tournament after the final.
    pub fn update_knockout_stage(&mut self, match_id: MatchId) -> Result<()> {
        self.require_phase(TournamentPhase::KnockoutStage)?;
        let tie = *self
            .ties
            .iter()
            .find(|t| t.match_id == match_id)
            .ok_or(SimError::UnknownMatch(match_id))?;
        let (winner, date) = {
            let result = self.resolved(match_id)?;
            (result.winner, result.date)
        };

        if tie.round + 1 == self.rounds {
            self.winner = Some(winner);
            self.phase = TournamentPhase::Finished;
            info!(tournament = %self.name, winner = winner.0, "tournament finished");
            return Ok(());
        }

        let (round, index) = (tie.round + 1, tie.index / 2);
        let takes_home = tie.index % 2 == 0;
        let existing = self.ties.iter().find(|t| t.round == round && t.index == index).map(|t| t.match_id);

        match existing {
            Some(next_id) => {
                let next = self
                    .knockout_matches
                    .iter_mut()
                    .find(|m| m.id == next_id)
                    .ok_or(SimError::UnknownMatch(next_id))?;
                let slot = if takes_home { &mut next.home } else { &mut next.away };
                if slot.is_none() {
                    *slot = Some(winner);
                }
            }
            None => {
                let gap = if round + 1 == self.rounds { 3 } else { 2 };
                let (home, away) = if takes_home { (Some(winner), None) } else { (None, Some(winner)) };
                let id = self.match_ids.next_id();
                let fixture = Match::pending(id, home, away, date + Duration::days(gap), self.knockout_best_of);
                self.knockout_matches.push(fixture);
                self.ties.push(KnockoutTie { round, index, match_id: id });
            }
        }
        debug!(tournament = %self.name, round, index, "knockout winner advanced");
        Ok(())
    }

    /// Play one tournament match and fold the result into the group table or bracket.
    pub fn play_match<R: Rng>(
        &mut self,
        sim: &Simulator,
        registry: &mut Registry,
        match_id: MatchId,
        rng: &mut R,
    ) -> Result<MatchResult> {
        if let Some(fixture) = self.group_matches.iter_mut().find(|m| m.id == match_id) {
            if self.phase != TournamentPhase::GroupStage {
                return Err(SimError::wrong_phase(TournamentPhase::GroupStage.label(), self.phase));
            }
            let result = sim.play_match(registry, fixture, rng)?;
            self.update_group_standings(match_id)?;
            return Ok(result);
        }

        self.require_phase(TournamentPhase::KnockoutStage)?;
        let fixture = self
            .knockout_matches
            .iter_mut()
            .find(|m| m.id == match_id)
            .ok_or(SimError::UnknownMatch(match_id))?;
        let result = sim.play_match(registry, fixture, rng)?;
        self.update_knockout_stage(match_id)?;
        Ok(result)
    }

    /// Play everything that is left and return the winner.
    pub fn run<R: Rng>(&mut self, sim: &Simulator, registry: &mut Registry, rng: &mut R) -> Result<TeamId> {
        if self.phase == TournamentPhase::NotStarted {
            return Err(SimError::wrong_phase(TournamentPhase::GroupStage.label(), self.phase));
        }

        if self.phase == TournamentPhase::GroupStage {
            let open: Vec<MatchId> =
                self.group_matches.iter().filter(|m| !m.is_resolved()).map(|m| m.id).collect();
            for id in open {
                self.play_match(sim, registry, id, rng)?;
            }
            self.start_knockout_stage()?;
        }

        while self.phase == TournamentPhase::KnockoutStage {
            let next = self
                .knockout_matches
                .iter()
                .find(|m| !m.is_resolved() && m.teams().is_ok())
                .map(|m| m.id);
            let Some(id) = next else {
                break;
            };
            self.play_match(sim, registry, id, rng)?;
        }

        self.winner
            .ok_or_else(|| SimError::wrong_phase(TournamentPhase::Finished.label(), self.phase))
    }

    fn round_label(&self, round: u32) -> String {
        match self.rounds.saturating_sub(round + 1) {
            0 => "Final".to_string(),
            1 => "Semifinal".to_string(),
            2 => "Quarterfinal".to_string(),
            _ => format!("Round of {}", 1usize << (self.rounds - round)),
        }
    }

    pub fn get_stats(&self) -> TournamentStats {
        let groups = self
            .groups
            .iter()
            .map(|group| {
                let mut rows: Vec<GroupRow> = group
                    .teams
                    .iter()
                    .map(|team| {
                        let played: Vec<&Match> = self
                            .group_matches
                            .iter()
                            .filter(|m| m.is_resolved() && m.involves(*team))
                            .collect();
                        let wins = played.iter().filter(|m| m.winner() == Some(*team)).count() as u32;
                        let losses = played.len() as u32 - wins;
                        GroupRow { team: *team, wins, losses, matches_played: played.len() as u32, points: wins * 3 }
                    })
                    .collect();
                rows.sort_by(|a, b| (b.points, b.wins).cmp(&(a.points, a.wins)));
                GroupTable { name: group.name.clone(), rows }
            })
            .collect();

        let knockout = self
            .ties
            .iter()
            .filter_map(|tie| {
                let m = self.knockout_matches.iter().find(|m| m.id == tie.match_id)?;
                Some(KnockoutSummary {
                    match_id: m.id,
                    round: self.round_label(tie.round),
                    home: m.home,
                    away: m.away,
                    completed: m.is_resolved(),
                    winner: m.winner(),
                    loser: m.loser(),
                    score: m.result.as_ref().map(|r| format!("{}-{}", r.winner_score, r.loser_score)),
                })
            })
            .collect();

        TournamentStats {
            name: self.name.clone(),
            phase: self.phase,
            start_date: self.start_date,
            groups,
            knockout,
            winner: self.winner,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRow {
    pub team: TeamId,
    pub wins: u32,
    pub losses: u32,
    pub matches_played: u32,
    /// Three per win.
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupTable {
    pub name: String,
    pub rows: Vec<GroupRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnockoutSummary {
    pub match_id: MatchId,
    pub round: String,
    pub home: Option<TeamId>,
    pub away: Option<TeamId>,
    pub completed: bool,
    pub winner: Option<TeamId>,
    pub loser: Option<TeamId>,
    pub score: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentStats {
    pub name: String,
    pub phase: TournamentPhase,
    pub start_date: NaiveDate,
    pub groups: Vec<GroupTable>,
    pub knockout: Vec<KnockoutSummary>,
    pub winner: Option<TeamId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::data::demo;
    use crate::models::ChampionCatalogue;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 1).unwrap()
    }

    fn setup(seed: u64) -> (Simulator, demo::DemoWorld, ChaCha8Rng) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let world = demo::generate(4, &mut rng).unwrap();
        let sim = Simulator::new(Arc::new(ChampionCatalogue::standard()), SimConfig::default());
        (sim, world, rng)
    }

    #[test]
    fn test_groups_are_drawn_and_scheduled() {
        let (sim, world, mut rng) = setup(1);
        let t = Tournament::initialize("Worlds", start(), &world.leagues, &world.registry, sim.config(), &mut rng)
            .unwrap();

        assert_eq!(t.phase, TournamentPhase::GroupStage);
        assert_eq!(t.teams.len(), 16);
        let names: Vec<&str> = t.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, ["A", "B", "C", "D"]);
        assert!(t.groups.iter().all(|g| g.teams.len() == 4));

        assert_eq!(t.group_matches.len(), 24);
        for m in &t.group_matches {
            let (home, away) = m.teams().unwrap();
            assert!(t.groups.iter().any(|g| g.contains(home) && g.contains(away)));
        }
        for pair in t.group_matches.windows(2) {
            assert_eq!(pair[1].date - pair[0].date, Duration::days(1));
        }
    }

    #[test]
    fn test_uneven_groups_are_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let world = demo::generate(5, &mut rng).unwrap();
        let mut config = SimConfig::default();
        config.tournament.teams_per_league = 5;
        let err = Tournament::initialize("Worlds", start(), &world.leagues[..2], &world.registry, &config, &mut rng)
            .unwrap_err();
        assert_eq!(err, SimError::GroupConfig { teams: 10, groups: 4 });
    }

    #[test]
    fn test_knockout_waits_for_group_stage() {
        let (sim, mut world, mut rng) = setup(3);
        let mut t = Tournament::initialize("MSI", start(), &world.leagues, &world.registry, sim.config(), &mut rng)
            .unwrap();
        let first = t.group_matches[0].id;
        t.play_match(&sim, &mut world.registry, first, &mut rng).unwrap();
        assert!(matches!(t.start_knockout_stage(), Err(SimError::UnresolvedMatch(_))));

        // Standings only count a match once.
        t.update_group_standings(first).unwrap();
        let wins: u32 = t.groups.iter().flat_map(|g| g.standings.iter()).map(|e| e.wins).sum();
        assert_eq!(wins, 1);
    }

    #[test]
    fn test_knockout_rejects_groups_without_two_teams() {
        let (sim, mut world, mut rng) = setup(6);
        let mut t = Tournament::initialize("MSI", start(), &world.leagues, &world.registry, sim.config(), &mut rng)
            .unwrap();
        let ids: Vec<MatchId> = t.group_matches.iter().map(|m| m.id).collect();
        for id in ids {
            t.play_match(&sim, &mut world.registry, id, &mut rng).unwrap();
        }

        let mut thin = t.clone();
        thin.groups[1].standings.truncate(1);
        assert_eq!(thin.start_knockout_stage().unwrap_err(), SimError::GroupConfig { teams: 16, groups: 4 });
        assert_eq!(thin.phase, TournamentPhase::GroupStage);
        assert!(thin.knockout_matches.is_empty());

        let mut odd = t.clone();
        odd.groups.pop();
        assert!(matches!(odd.start_knockout_stage(), Err(SimError::GroupConfig { groups: 3, .. })));

        t.start_knockout_stage().unwrap();
        assert_eq!(t.knockout_matches.len(), 4);
    }

    #[test]
    fn test_knockout_pairings_cross_groups() {
        let (sim, mut world, mut rng) = setup(4);
        let mut t = Tournament::initialize("Worlds", start(), &world.leagues, &world.registry, sim.config(), &mut rng)
            .unwrap();
        let ids: Vec<MatchId> = t.group_matches.iter().map(|m| m.id).collect();
        for id in ids {
            t.play_match(&sim, &mut world.registry, id, &mut rng).unwrap();
        }
        t.start_knockout_stage().unwrap();
        assert_eq!(t.phase, TournamentPhase::KnockoutStage);
        assert_eq!(t.knockout_matches.len(), 4);

        let top = |g: usize, place: usize| t.groups[g].ranked()[place].team;
        let pair = |i: usize| t.knockout_matches[i].teams().unwrap();
        assert_eq!(pair(0), (top(0, 0), top(1, 1)));
        assert_eq!(pair(1), (top(2, 0), top(3, 1)));
        assert_eq!(pair(2), (top(1, 0), top(0, 1)));
        assert_eq!(pair(3), (top(3, 0), top(2, 1)));

        let entrants: BTreeSet<TeamId> = (0..4).flat_map(|i| [pair(i).0, pair(i).1]).collect();
        assert_eq!(entrants.len(), 8);
    }

    #[test]
    fn test_full_tournament_and_rewards() {
        let (sim, mut world, mut rng) = setup(5);
        let mut t = Tournament::initialize("Worlds", start(), &world.leagues, &world.registry, sim.config(), &mut rng)
            .unwrap();
        let budgets: Vec<i64> = t.teams.iter().map(|id| world.registry.team(*id).unwrap().budget).collect();

        let winner = t.run(&sim, &mut world.registry, &mut rng).unwrap();
        assert_eq!(t.phase, TournamentPhase::Finished);
        assert_eq!(t.winner, Some(winner));
        assert_eq!(t.knockout_matches.len(), 7);
        assert!(t.knockout_matches.iter().all(|m| m.is_resolved() && m.best_of == 5));

        let stats = t.get_stats();
        assert_eq!(stats.knockout.iter().filter(|k| k.round == "Final").count(), 1);
        assert_eq!(stats.knockout.iter().filter(|k| k.round == "Quarterfinal").count(), 4);
        assert!(stats.groups.iter().all(|g| g.rows.iter().map(|r| r.matches_played).sum::<u32>() == 6));

        let placements = t.award_rewards(&mut world.registry, sim.config()).unwrap();
        assert_eq!(placements.len(), 16);
        let count = |finish: Finish| placements.iter().filter(|p| p.finish == finish).count();
        assert_eq!(
            [Finish::Champion, Finish::RunnerUp, Finish::SemiFinalist, Finish::QuarterFinalist, Finish::GroupStage]
                .map(count),
            [1, 1, 2, 4, 8]
        );

        let paid: i64 = t
            .teams
            .iter()
            .zip(&budgets)
            .map(|(id, before)| world.registry.team(*id).unwrap().budget - before)
            .sum();
        assert_eq!(paid, 1_000_000);
        assert_eq!(world.registry.team(winner).unwrap().world_championships, 1);

        // Paying out twice is a no-op.
        t.award_rewards(&mut world.registry, sim.config()).unwrap();
        assert_eq!(world.registry.team(winner).unwrap().world_championships, 1);
    }

    #[test]
    fn test_seeded_tournaments_replay_identically() {
        let play = |seed| {
            let (sim, mut world, mut rng) = setup(seed);
            let mut t =
                Tournament::initialize("Worlds", start(), &world.leagues, &world.registry, sim.config(), &mut rng)
                    .unwrap();
            t.run(&sim, &mut world.registry, &mut rng).unwrap();
            serde_json::to_string(&t.get_stats()).unwrap()
        };
        assert_eq!(play(99), play(99));
    }
}

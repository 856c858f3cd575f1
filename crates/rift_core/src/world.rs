//! Game world: every league, the shared registry and the international calendar.
//!
//! [`World::simulate_all_leagues`] is the weekly tick. Each call advances every league by a
//! regular-season week or a playoff round, moves the calendar forward a week and then lets
//! any due tournament start or progress.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Duration, NaiveDate};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::data::DemoWorld;
use crate::error::{Result, SimError};
use crate::league::{League, SeasonPhase, Split, PLAYOFFS};
use crate::models::{Match, MatchId, MatchResult, Registry, Role, TeamId};
use crate::sim::Simulator;
use crate::tournament::rewards::Placement;
use crate::tournament::{Tournament, TournamentPhase};

/// Calendar days covered by one [`World::simulate_all_leagues`] step.
pub const DAYS_PER_STEP: i64 = 7;

pub const FACILITY_COST_PER_LEVEL: u64 = 1_000;
pub const SPONSORSHIP_PER_FAN: f64 = 0.1;
pub const MERCHANDISE_PER_FAN: f64 = 0.05;

/// Number of latest series that drive morale.
const RECENT_FORM_WINDOW: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledTournament {
    pub name: String,
    pub start_date: NaiveDate,
    /// Participating league names. `None` draws from every league.
    pub leagues: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedTournament {
    pub tournament: Tournament,
    pub placements: Vec<Placement>,
}

/// What one tournament update played.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TournamentUpdate {
    pub started: Option<String>,
    pub results: Vec<MatchResult>,
    pub completed: Option<String>,
}

/// Everything one world step played, keyed by league then division.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    pub date: NaiveDate,
    pub leagues: BTreeMap<String, BTreeMap<String, Vec<MatchResult>>>,
    pub tournament: TournamentUpdate,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancialOverview {
    pub budget: i64,
    pub total_salary: u64,
    pub sponsorship_income: f64,
    pub merchandise_revenue: f64,
    pub facility_costs: u64,
}

impl FinancialOverview {
    /// Sponsorship plus merchandise, minus salaries and facility upkeep.
    pub fn net_income(&self) -> f64 {
        self.sponsorship_income + self.merchandise_revenue
            - self.total_salary as f64
            - self.facility_costs as f64
    }
}

/// Team condition on a 0-100 scale, rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TeamPerformance {
    pub synergy: f64,
    pub morale: f64,
    pub form: f64,
    pub overall: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub registry: Registry,
    pub leagues: Vec<League>,
    pub current_date: NaiveDate,
    /// The caller's own team. Its league matches are left for the caller to play.
    pub managed_team: Option<TeamId>,
    pub scheduled_tournaments: Vec<ScheduledTournament>,
    pub current_tournament: Option<Tournament>,
    pub completed_tournaments: Vec<CompletedTournament>,
}

impl World {
    pub fn new(registry: Registry, leagues: Vec<League>, current_date: NaiveDate) -> Self {
        Self {
            registry,
            leagues,
            current_date,
            managed_team: None,
            scheduled_tournaments: Vec::new(),
            current_tournament: None,
            completed_tournaments: Vec::new(),
        }
    }

    pub fn from_demo(demo: DemoWorld, current_date: NaiveDate) -> Self {
        Self::new(demo.registry, demo.leagues, current_date)
    }

    pub fn league(&self, name: &str) -> Result<&League> {
        self.leagues
            .iter()
            .find(|l| l.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| SimError::UnknownLeague(name.to_string()))
    }

    pub fn league_mut(&mut self, name: &str) -> Result<&mut League> {
        self.leagues
            .iter_mut()
            .find(|l| l.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| SimError::UnknownLeague(name.to_string()))
    }

    pub fn league_of(&self, team: TeamId) -> Option<&League> {
        self.leagues.iter().find(|l| l.all_teams().contains(&team))
    }

    /// Start a new split in every league, opening on the current date.
    pub fn start_season<R: Rng>(&mut self, sim: &Simulator, split: Split, rng: &mut R) -> Result<()> {
        for league in self.leagues.iter_mut() {
            league.start_new_season(sim, &mut self.registry, split, self.current_date, rng)?;
        }
        Ok(())
    }

    /// True once every league has crowned its champion.
    pub fn all_leagues_finished(&self) -> bool {
        self.leagues.iter().all(|l| l.phase() == Some(SeasonPhase::OffSeason))
    }

    /// Advance every league one step, move the calendar a week and update tournaments.
    pub fn simulate_all_leagues<R: Rng>(&mut self, sim: &Simulator, rng: &mut R) -> Result<StepReport> {
        let mut leagues = BTreeMap::new();
        let playoffs_best_of = sim.config().series.playoffs;

        for league in self.leagues.iter_mut() {
            if league.phase() == Some(SeasonPhase::RegularSeason) && league.is_regular_season_finished() {
                league.start_playoffs(&self.registry, playoffs_best_of)?;
            }

            match league.phase() {
                Some(SeasonPhase::RegularSeason) => {
                    let played = league.simulate_week(sim, &mut self.registry, self.managed_team, rng)?;
                    leagues.insert(league.name.clone(), played);
                }
                Some(SeasonPhase::Playoffs) => {
                    let before: BTreeSet<MatchId> = resolved_ids(&league.division(PLAYOFFS)?.matches);
                    league.simulate_playoff_round(sim, &mut self.registry, rng)?;
                    let played: Vec<MatchResult> = league
                        .division(PLAYOFFS)?
                        .matches
                        .iter()
                        .filter(|m| !before.contains(&m.id))
                        .filter_map(|m| m.result.clone())
                        .collect();
                    leagues.insert(league.name.clone(), BTreeMap::from([(PLAYOFFS.to_string(), played)]));
                }
                _ => {}
            }
        }

        let date = self.current_date;
        self.current_date += Duration::days(DAYS_PER_STEP);
        let tournament = self.update_tournaments(sim, rng)?;
        debug!(%date, leagues = leagues.len(), "world step simulated");
        Ok(StepReport { date, leagues, tournament })
    }

    /// Queue a tournament. It starts on the first update on or after `start_date`.
    pub fn schedule_tournament(
        &mut self,
        name: impl Into<String>,
        start_date: NaiveDate,
        leagues: Option<Vec<String>>,
    ) {
        let entry = ScheduledTournament { name: name.into(), start_date, leagues };
        let at = self.scheduled_tournaments.partition_point(|t| t.start_date <= start_date);
        info!(tournament = %entry.name, %start_date, "tournament scheduled");
        self.scheduled_tournaments.insert(at, entry);
    }

    /// Start the next due tournament, play its matches dated up to today and pay out once
    /// it is finished.
    pub fn update_tournaments<R: Rng>(&mut self, sim: &Simulator, rng: &mut R) -> Result<TournamentUpdate> {
        let mut update = TournamentUpdate::default();
        let today = self.current_date;

        let due = self.scheduled_tournaments.first().is_some_and(|t| t.start_date <= today);
        if self.current_tournament.is_none() && due {
            let next = self.scheduled_tournaments.remove(0);
            let participants = match &next.leagues {
                Some(names) => names.iter().map(|n| self.league(n)).collect::<Result<Vec<_>>>()?,
                None => self.leagues.iter().collect(),
            };
            let tournament =
                Tournament::initialize(next.name, next.start_date, participants, &self.registry, sim.config(), rng)?;
            info!(tournament = %tournament.name, %today, "tournament started");
            update.started = Some(tournament.name.clone());
            self.current_tournament = Some(tournament);
        }

        let Some(tournament) = self.current_tournament.as_mut() else {
            return Ok(update);
        };

        loop {
            let open: Vec<MatchId> = match tournament.phase {
                TournamentPhase::GroupStage => tournament
                    .group_matches
                    .iter()
                    .filter(|m| !m.is_resolved() && m.date <= today)
                    .map(|m| m.id)
                    .collect(),
                TournamentPhase::KnockoutStage => tournament
                    .knockout_matches
                    .iter()
                    .filter(|m| !m.is_resolved() && m.teams().is_ok() && m.date <= today)
                    .map(|m| m.id)
                    .collect(),
                _ => Vec::new(),
            };

            if open.is_empty() {
                let groups_done = tournament.group_matches.iter().all(Match::is_resolved);
                if tournament.phase == TournamentPhase::GroupStage && groups_done {
                    tournament.start_knockout_stage()?;
                    continue;
                }
                break;
            }
            for id in open {
                update.results.push(tournament.play_match(sim, &mut self.registry, id, rng)?);
            }
        }

        if tournament.phase == TournamentPhase::Finished {
            let placements = tournament.award_rewards(&mut self.registry, sim.config())?;
            if let Some(tournament) = self.current_tournament.take() {
                info!(tournament = %tournament.name, "tournament completed");
                update.completed = Some(tournament.name.clone());
                self.completed_tournaments.push(CompletedTournament { tournament, placements });
            }
        }
        Ok(update)
    }

    pub fn financial_overview(&self, team: TeamId) -> Result<FinancialOverview> {
        let record = self.registry.team(team)?;
        let fans = record.fanbase as f64;
        Ok(FinancialOverview {
            budget: record.budget,
            total_salary: self.registry.total_salary(team)?,
            sponsorship_income: fans * SPONSORSHIP_PER_FAN,
            merchandise_revenue: fans * MERCHANDISE_PER_FAN,
            facility_costs: record.training_facilities as u64 * FACILITY_COST_PER_LEVEL,
        })
    }

    /// Resolved league series involving `team`, newest first.
    pub fn recent_results(&self, team: TeamId, limit: usize) -> Vec<&MatchResult> {
        let mut played: Vec<&Match> = self
            .league_of(team)
            .into_iter()
            .flat_map(|l| l.divisions.iter())
            .flat_map(|d| d.matches.iter())
            .filter(|m| m.is_resolved() && m.involves(team))
            .collect();
        played.sort_by(|a, b| b.date.cmp(&a.date));
        played.into_iter().filter_map(|m| m.result.as_ref()).take(limit).collect()
    }

    /// Synergy from the starters' communication and leadership, morale from the last five
    /// series and form from the league win rate. Teams without games sit at 50.
    pub fn team_performance(&self, team: TeamId) -> Result<TeamPerformance> {
        let record = self.registry.team(team)?;
        let synergy = Role::ALL
            .iter()
            .filter_map(|role| record.starter(*role))
            .filter_map(|id| self.registry.player(id))
            .map(|p| p.attributes.communication as f64 * 0.6 + p.attributes.leadership as f64 * 0.4)
            .sum::<f64>()
            / Role::ALL.len() as f64;

        let recent = self.recent_results(team, RECENT_FORM_WINDOW);
        let morale = if recent.is_empty() {
            50.0
        } else {
            let wins = recent.iter().filter(|r| r.winner == team).count();
            50.0 + wins as f64 / recent.len() as f64 * 50.0
        };
        let form = match self.played_record(team) {
            (0, 0) => 50.0,
            (wins, losses) => 50.0 + wins as f64 / (wins + losses) as f64 * 50.0,
        };

        Ok(TeamPerformance {
            synergy: round2(synergy),
            morale: round2(morale),
            form: round2(form),
            overall: round2(synergy * 0.4 + morale * 0.3 + form * 0.3),
        })
    }

    /// One-based rank in the regular-season table of the team's division.
    pub fn league_position(&self, team: TeamId) -> Result<Option<usize>> {
        let Some(league) = self.league_of(team) else {
            return Ok(None);
        };
        for division in league.divisions.iter().filter(|d| d.name != PLAYOFFS && d.teams.contains(&team)) {
            let standings = division.standings(&self.registry)?;
            if let Some(rank) = standings.iter().position(|row| row.team == team) {
                return Ok(Some(rank + 1));
            }
        }
        Ok(None)
    }

    /// League position as "1st", "2nd", "13th" and so on.
    pub fn league_position_label(&self, team: TeamId) -> Result<Option<String>> {
        Ok(self.league_position(team)?.map(ordinal))
    }

    /// Percentage of league series won this season, playoffs included.
    pub fn win_rate(&self, team: TeamId) -> f64 {
        match self.played_record(team) {
            (0, 0) => 0.0,
            (wins, losses) => wins as f64 / (wins + losses) as f64 * 100.0,
        }
    }

    fn played_record(&self, team: TeamId) -> (usize, usize) {
        self.league_of(team)
            .into_iter()
            .flat_map(|l| l.divisions.iter())
            .flat_map(|d| d.matches.iter())
            .filter(|m| m.involves(team))
            .filter_map(|m| m.winner())
            .fold((0, 0), |(w, l), winner| if winner == team { (w + 1, l) } else { (w, l + 1) })
    }
}

pub fn ordinal(n: usize) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

fn resolved_ids(matches: &[Match]) -> BTreeSet<MatchId> {
    matches.iter().filter(|m| m.is_resolved()).map(|m| m.id).collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

//! Domestic league: divisions, weekly regular season and six-team playoffs.
//!
//! A [`League`] owns its matches; teams and players live in the shared [`Registry`] and are
//! referenced by id. Every operation that plays a match goes through a [`Simulator`].

pub mod bracket;
pub mod schedule;
pub mod season;
pub mod standings;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub use bracket::{BracketSlot, PlayoffBracket, PlayoffRound, SlotSource, PLAYOFF_TEAMS};
pub use schedule::generate_schedule;
pub use season::{Season, SeasonPhase, Split};
pub use standings::{compute_standings, HeadToHead, TeamStanding};

use crate::error::{Result, SimError};
use crate::models::{Match, MatchId, MatchIdSequence, MatchResult, MatchStatus, Registry, TeamId, TitleKind};
use crate::sim::Simulator;

pub const REGULAR_SEASON: &str = "Regular Season";
pub const PLAYOFFS: &str = "Playoffs";
pub const MIN_LEAGUE_TEAMS: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Division {
    pub name: String,
    pub teams: Vec<TeamId>,
    pub matches: Vec<Match>,
}

impl Division {
    pub fn new(name: impl Into<String>, teams: Vec<TeamId>) -> Self {
        Self { name: name.into(), teams, matches: Vec::new() }
    }

    pub fn standings(&self, registry: &Registry) -> Result<Vec<TeamStanding>> {
        compute_standings(&self.teams, &self.matches, registry)
    }

    pub fn is_complete(&self) -> bool {
        self.matches.iter().all(Match::is_resolved)
    }
}

/// Progress of one qualified team through the playoffs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayoffStanding {
    pub team: TeamId,
    pub wins: u32,
    pub losses: u32,
    /// `None` once the team is eliminated.
    pub current_round: Option<PlayoffRound>,
    pub current_opponent: Option<TeamId>,
    pub championship_points: u32,
}

impl PlayoffStanding {
    pub fn round_label(&self) -> &'static str {
        self.current_round.map_or("Eliminated", |round| round.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct League {
    pub name: String,
    pub divisions: Vec<Division>,
    pub current_season: Option<Season>,
    pub season_history: Vec<Season>,
    pub bracket: Option<PlayoffBracket>,
    match_ids: MatchIdSequence,
}

impl League {
    pub fn new(name: impl Into<String>, divisions: Vec<Division>) -> Result<Self> {
        let total: usize = divisions.iter().map(|d| d.teams.len()).sum();
        if total < MIN_LEAGUE_TEAMS {
            return Err(SimError::LeagueTooSmall(total));
        }
        Ok(Self {
            name: name.into(),
            divisions,
            current_season: None,
            season_history: Vec::new(),
            bracket: None,
            match_ids: MatchIdSequence::default(),
        })
    }

    /// A league with a single regular-season division.
    pub fn with_teams(name: impl Into<String>, teams: Vec<TeamId>) -> Result<Self> {
        Self::new(name, vec![Division::new(REGULAR_SEASON, teams)])
    }

    fn competitive_divisions(&self) -> impl Iterator<Item = &Division> {
        self.divisions.iter().filter(|d| d.name != PLAYOFFS)
    }

    pub fn all_teams(&self) -> Vec<TeamId> {
        self.competitive_divisions().flat_map(|d| d.teams.iter().copied()).collect()
    }

    pub fn division(&self, name: &str) -> Result<&Division> {
        self.divisions
            .iter()
            .find(|d| d.name == name)
            .ok_or_else(|| SimError::UnknownDivision(name.to_string()))
    }

    pub fn phase(&self) -> Option<SeasonPhase> {
        self.current_season.as_ref().map(|s| s.phase)
    }

    pub fn season(&self) -> Result<&Season> {
        self.current_season
            .as_ref()
            .ok_or_else(|| SimError::wrong_phase("an active season", "none"))
    }

    fn season_mut(&mut self) -> Result<&mut Season> {
        self.current_season
            .as_mut()
            .ok_or_else(|| SimError::wrong_phase("an active season", "none"))
    }

    fn require_phase(&self, expected: SeasonPhase) -> Result<&Season> {
        let season = self.season()?;
        if season.phase != expected {
            return Err(SimError::wrong_phase(expected.label(), season.phase));
        }
        Ok(season)
    }

    /// Replace every division's fixtures with a fresh double round-robin. Returns the number
    /// of matches scheduled.
    pub fn generate_schedule<R: Rng>(&mut self, start: NaiveDate, best_of: u8, rng: &mut R) -> usize {
        let mut total = 0;
        for division in self.divisions.iter_mut().filter(|d| d.name != PLAYOFFS) {
            division.matches = generate_schedule(&division.teams, start, best_of, &mut self.match_ids, rng);
            total += division.matches.len();
        }
        total
    }

    /// Archive the current season, reset team records and schedule a new regular season.
    pub fn start_new_season<R: Rng>(
        &mut self,
        sim: &Simulator,
        registry: &mut Registry,
        split: Split,
        start: NaiveDate,
        rng: &mut R,
    ) -> Result<()> {
        if let Some(previous) = self.current_season.take() {
            self.season_history.push(previous);
        }
        self.divisions.retain(|d| d.name != PLAYOFFS);
        self.bracket = None;

        registry.reset_season_stats(&self.all_teams())?;
        let scheduled = self.generate_schedule(start, sim.config().series.regular_season, rng);
        let season = Season::new(split, start);
        info!(league = %self.name, season = %season.title(), matches = scheduled, "season started");
        self.current_season = Some(season);
        Ok(())
    }

    pub fn matches_for_week(&self, week: u32) -> Vec<&Match> {
        self.competitive_divisions()
            .flat_map(|d| d.matches.iter())
            .filter(|m| m.week == Some(week))
            .collect()
    }

    /// Play the current week's open matches in every division and advance the week.
    ///
    /// Matches involving `skip_team` and matches whose draft is in progress are left for the
    /// caller. Playoffs start automatically once every regular-season match is resolved.
    pub fn simulate_week<R: Rng>(
        &mut self,
        sim: &Simulator,
        registry: &mut Registry,
        skip_team: Option<TeamId>,
        rng: &mut R,
    ) -> Result<BTreeMap<String, Vec<MatchResult>>> {
        let week = self.require_phase(SeasonPhase::RegularSeason)?.current_week;

        let mut results = BTreeMap::new();
        for division in self.divisions.iter_mut().filter(|d| d.name != PLAYOFFS) {
            let mut played = Vec::new();
            for fixture in division.matches.iter_mut().filter(|m| m.week == Some(week)) {
                if fixture.is_resolved() {
                    continue;
                }
                if skip_team.is_some_and(|team| fixture.involves(team)) {
                    debug!(match_id = fixture.id.0, "skipping caller-controlled match");
                    continue;
                }
                if fixture.status() == MatchStatus::Drafting {
                    debug!(match_id = fixture.id.0, "skipping match with a draft in progress");
                    continue;
                }
                played.push(sim.play_match(registry, fixture, rng)?);
            }
            results.insert(division.name.clone(), played);
        }

        self.season_mut()?.current_week += 1;
        debug!(league = %self.name, week, "week simulated");

        if self.is_regular_season_finished() {
            self.start_playoffs(registry, sim.config().series.playoffs)?;
        }
        Ok(results)
    }

    pub fn is_regular_season_finished(&self) -> bool {
        self.division(REGULAR_SEASON).map_or(false, Division::is_complete)
    }

    pub fn standings(&self, division: &str, registry: &Registry) -> Result<Vec<TeamStanding>> {
        self.division(division)?.standings(registry)
    }

    /// Top six of the regular-season table in seed order.
    pub fn playoff_teams(&self, registry: &Registry) -> Result<Vec<TeamId>> {
        Ok(self
            .standings(REGULAR_SEASON, registry)?
            .into_iter()
            .take(PLAYOFF_TEAMS)
            .map(|row| row.team)
            .collect())
    }

    /// Seed the bracket from the regular-season table and enter the playoff phase.
    pub fn start_playoffs(&mut self, registry: &Registry, best_of: u8) -> Result<()> {
        self.require_phase(SeasonPhase::RegularSeason)?;
        let seeds = self.playoff_teams(registry)?;

        let regular = self.division(REGULAR_SEASON)?;
        let anchor = match regular.matches.iter().map(|m| m.date).max() {
            Some(date) => date,
            None => self.season()?.start_date,
        };

        let (bracket, matches) = PlayoffBracket::build(&seeds, anchor, best_of, &mut self.match_ids)?;
        self.divisions.retain(|d| d.name != PLAYOFFS);
        self.divisions.push(Division { name: PLAYOFFS.to_string(), teams: seeds.clone(), matches });
        self.bracket = Some(bracket);

        let season = self.season_mut()?;
        season.phase = SeasonPhase::Playoffs;
        season.playoff_teams = seeds;
        info!(league = %self.name, "playoffs started");
        Ok(())
    }

    /// Play one playoff match, award playoff points and advance the bracket.
    pub fn simulate_playoff_match<R: Rng>(
        &mut self,
        sim: &Simulator,
        registry: &mut Registry,
        match_id: MatchId,
        rng: &mut R,
    ) -> Result<MatchResult> {
        self.require_phase(SeasonPhase::Playoffs)?;
        let fixture = self
            .divisions
            .iter_mut()
            .filter(|d| d.name == PLAYOFFS)
            .flat_map(|d| d.matches.iter_mut())
            .find(|m| m.id == match_id)
            .ok_or(SimError::UnknownMatch(match_id))?;
        let result = sim.play_match(registry, fixture, rng)?;

        let rewards = &sim.config().rewards;
        registry.team_mut(result.winner)?.championship_points += rewards.playoff_win_points;
        registry.team_mut(result.loser)?.championship_points += rewards.playoff_loss_points;

        self.refresh_bracket(sim, registry)?;
        Ok(result)
    }

    /// Propagate resolved winners and crown the champion once the final is played.
    /// Returns whether the playoffs are over.
    fn refresh_bracket(&mut self, sim: &Simulator, registry: &mut Registry) -> Result<bool> {
        let Some(bracket) = &self.bracket else {
            return Ok(false);
        };
        let Some(division) = self.divisions.iter_mut().find(|d| d.name == PLAYOFFS) else {
            return Ok(false);
        };
        bracket.advance(&mut division.matches);
        let Some(champion) = bracket.champion(&division.matches) else {
            return Ok(false);
        };

        let season = self.season_mut()?;
        if season.phase == SeasonPhase::Playoffs {
            season.phase = SeasonPhase::OffSeason;
            season.champion = Some(champion);
            registry.award_title(champion, TitleKind::Domestic, sim.config().rewards.domestic_title_points)?;
            info!(league = %self.name, champion = registry.team_name(champion), "season champion crowned");
        }
        Ok(true)
    }

    /// Play every playoff match whose teams are known. Returns `true` once the final has
    /// been played.
    pub fn simulate_playoff_round<R: Rng>(
        &mut self,
        sim: &Simulator,
        registry: &mut Registry,
        rng: &mut R,
    ) -> Result<bool> {
        self.require_phase(SeasonPhase::Playoffs)?;
        if self.refresh_bracket(sim, registry)? {
            return Ok(true);
        }

        let ready: Vec<MatchId> = self
            .division(PLAYOFFS)?
            .matches
            .iter()
            .filter(|m| !m.is_resolved() && m.teams().is_ok())
            .map(|m| m.id)
            .collect();
        for id in ready {
            self.simulate_playoff_match(sim, registry, id, rng)?;
        }
        Ok(self.phase() == Some(SeasonPhase::OffSeason))
    }

    pub fn champion(&self) -> Option<TeamId> {
        self.current_season.as_ref().and_then(|s| s.champion)
    }

    /// Per-team playoff progress. Empty outside the playoff phase.
    pub fn playoff_standings(&self, registry: &Registry) -> Result<Vec<PlayoffStanding>> {
        let (Some(season), Some(bracket)) = (&self.current_season, &self.bracket) else {
            return Ok(Vec::new());
        };
        if season.phase != SeasonPhase::Playoffs {
            return Ok(Vec::new());
        }
        let matches = &self.division(PLAYOFFS)?.matches;

        season
            .playoff_teams
            .iter()
            .map(|team| -> Result<PlayoffStanding> {
                let team = *team;
                let played = matches.iter().filter(|m| m.is_resolved() && m.involves(team));
                let (wins, losses) = played.fold((0, 0), |(w, l), m| {
                    if m.winner() == Some(team) {
                        (w + 1, l)
                    } else {
                        (w, l + 1)
                    }
                });
                let current = matches.iter().find(|m| !m.is_resolved() && m.involves(team));
                Ok(PlayoffStanding {
                    team,
                    wins,
                    losses,
                    current_round: current.and_then(|m| bracket.round_of(m.id)),
                    current_opponent: current.and_then(|m| m.opponent_of(team)),
                    championship_points: registry.team(team)?.championship_points,
                })
            })
            .collect()
    }

    pub fn find_match(&self, id: MatchId) -> Option<&Match> {
        self.divisions.iter().flat_map(|d| d.matches.iter()).find(|m| m.id == id)
    }

    /// Mutable access for callers that draft a match themselves.
    pub fn match_mut(&mut self, id: MatchId) -> Result<&mut Match> {
        self.divisions
            .iter_mut()
            .flat_map(|d| d.matches.iter_mut())
            .find(|m| m.id == id)
            .ok_or(SimError::UnknownMatch(id))
    }

    /// Resolve one caller-controlled match, typically one the caller drafted by hand.
    ///
    /// Playoff matches are routed through [`League::simulate_playoff_match`].
    pub fn play_match<R: Rng>(
        &mut self,
        sim: &Simulator,
        registry: &mut Registry,
        match_id: MatchId,
        rng: &mut R,
    ) -> Result<MatchResult> {
        let in_playoffs = self
            .division(PLAYOFFS)
            .map_or(false, |d| d.matches.iter().any(|m| m.id == match_id));
        if in_playoffs {
            return self.simulate_playoff_match(sim, registry, match_id, rng);
        }

        self.require_phase(SeasonPhase::RegularSeason)?;
        let fixture = self.match_mut(match_id)?;
        let result = sim.play_match(registry, fixture, rng)?;

        if self.is_regular_season_finished() {
            self.start_playoffs(registry, sim.config().series.playoffs)?;
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::config::SimConfig;
    use crate::models::{ChampionCatalogue, Player, PlayerAttributes, Role, Team};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 18).unwrap()
    }

    fn world(n: usize) -> (Simulator, Registry, Vec<TeamId>) {
        let mut registry = Registry::new();
        let contract = NaiveDate::from_ymd_opt(2027, 11, 30).unwrap();
        let teams = (0..n)
            .map(|i| {
                let team = registry.add_team(Team::new(format!("Team {i}"), "LCK", 1_000_000)).unwrap();
                for role in Role::ALL {
                    let skill = 60 + (i as u8 * 3);
                    let attrs = PlayerAttributes::new(skill, skill, skill, skill);
                    let name = format!("P{i}{}", role.label());
                    registry.add_player(team, Player::new(name, role, attrs, "KR", 50_000, contract)).unwrap();
                }
                team
            })
            .collect();
        let sim = Simulator::new(Arc::new(ChampionCatalogue::standard()), SimConfig::default());
        (sim, registry, teams)
    }

    fn run_regular_season(
        league: &mut League,
        sim: &Simulator,
        registry: &mut Registry,
        rng: &mut ChaCha8Rng,
    ) {
        for _ in 0..100 {
            if league.phase() != Some(SeasonPhase::RegularSeason) {
                return;
            }
            league.simulate_week(sim, registry, None, rng).unwrap();
        }
        panic!("regular season never finished");
    }

    #[test]
    fn test_league_needs_four_teams() {
        let err = League::with_teams("Tiny", vec![TeamId(0), TeamId(1), TeamId(2)]).unwrap_err();
        assert_eq!(err, SimError::LeagueTooSmall(3));
    }

    #[test]
    fn test_simulate_week_requires_regular_season() {
        let (sim, mut registry, teams) = world(4);
        let mut league = League::with_teams("LCK", teams).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = league.simulate_week(&sim, &mut registry, None, &mut rng).unwrap_err();
        assert!(matches!(err, SimError::WrongPhase { .. }));
    }

    #[test]
    fn test_full_season_crowns_a_champion() {
        let (sim, mut registry, teams) = world(8);
        let mut league = League::with_teams("LCK", teams.clone()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(2025);

        league.start_new_season(&sim, &mut registry, Split::Spring, start(), &mut rng).unwrap();
        assert_eq!(league.division(REGULAR_SEASON).unwrap().matches.len(), 56);

        run_regular_season(&mut league, &sim, &mut registry, &mut rng);
        assert_eq!(league.phase(), Some(SeasonPhase::Playoffs));
        assert!(league.is_regular_season_finished());

        let seeds = league.season().unwrap().playoff_teams.clone();
        let table = league.standings(REGULAR_SEASON, &registry).unwrap();
        assert_eq!(seeds, table.iter().take(6).map(|row| row.team).collect::<Vec<_>>());
        assert_eq!(league.division(PLAYOFFS).unwrap().matches.len(), 5);

        let standings = league.playoff_standings(&registry).unwrap();
        assert_eq!(standings.len(), 6);
        assert_eq!(standings[0].round_label(), "Semi-Finals");
        assert_eq!(standings[2].round_label(), "Quarter-Finals");
        assert_eq!(standings[2].current_opponent, Some(seeds[5]));

        let mut rounds = 0;
        while !league.simulate_playoff_round(&sim, &mut registry, &mut rng).unwrap() {
            rounds += 1;
            assert!(rounds < 5);
        }
        assert_eq!(rounds, 2);

        let season = league.season().unwrap();
        assert!(season.is_finished());
        let champion = league.champion().unwrap();
        assert!(seeds.contains(&champion));
        assert_eq!(registry.team(champion).unwrap().domestic_titles, 1);
        assert!(league.playoff_standings(&registry).unwrap().is_empty());

        let finals = league.division(PLAYOFFS).unwrap().matches.last().unwrap();
        assert_eq!(finals.result.as_ref().unwrap().winner_score, 3);
    }

    #[test]
    fn test_caller_controlled_team_is_skipped() {
        let (sim, mut registry, teams) = world(6);
        let mine = teams[0];
        let mut league = League::with_teams("LEC", teams).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        league.start_new_season(&sim, &mut registry, Split::Summer, start(), &mut rng).unwrap();

        let mine_this_week: Vec<MatchId> =
            league.matches_for_week(0).iter().filter(|m| m.involves(mine)).map(|m| m.id).collect();
        league.simulate_week(&sim, &mut registry, Some(mine), &mut rng).unwrap();

        for id in &mine_this_week {
            assert!(!league.find_match(*id).unwrap().is_resolved());
        }
        assert!(league.matches_for_week(0).iter().filter(|m| !m.involves(mine)).all(|m| m.is_resolved()));

        for id in mine_this_week {
            let result = league.play_match(&sim, &mut registry, id, &mut rng).unwrap();
            assert!(result.winner == mine || result.loser == mine);
        }
    }

    #[test]
    fn test_match_with_draft_in_progress_is_skipped() {
        use crate::models::{ChampionId, Side};

        let (sim, mut registry, teams) = world(6);
        let mut league = League::with_teams("LCK", teams).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        league.start_new_season(&sim, &mut registry, Split::Spring, start(), &mut rng).unwrap();

        let drafting = league.matches_for_week(0)[0].id;
        {
            let fixture = league.match_mut(drafting).unwrap();
            let draft = fixture.start_draft(true).unwrap();
            draft.apply_ban(sim.catalogue(), ChampionId(0), Side::Blue).unwrap();
        }
        let draft_before = league.find_match(drafting).unwrap().draft.clone();

        league.simulate_week(&sim, &mut registry, None, &mut rng).unwrap();

        let fixture = league.find_match(drafting).unwrap();
        assert!(!fixture.is_resolved());
        assert_eq!(fixture.status(), MatchStatus::Drafting);
        assert_eq!(fixture.draft, draft_before);
        assert_eq!(fixture.draft.as_ref().unwrap().bans.len(), 1);
        assert!(league.matches_for_week(0).iter().filter(|m| m.id != drafting).all(|m| m.is_resolved()));
    }

    #[test]
    fn test_small_league_cannot_seed_playoffs() {
        let (sim, mut registry, teams) = world(5);
        let mut league = League::with_teams("LCS", teams).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        league.start_new_season(&sim, &mut registry, Split::Spring, start(), &mut rng).unwrap();

        let mut outcome = Ok(BTreeMap::new());
        for _ in 0..100 {
            outcome = league.simulate_week(&sim, &mut registry, None, &mut rng);
            if outcome.is_err() {
                break;
            }
        }
        assert_eq!(outcome.unwrap_err(), SimError::PlayoffSeeding { expected: 6, found: 5 });
    }

    #[test]
    fn test_new_season_archives_and_resets() {
        let (sim, mut registry, teams) = world(8);
        let mut league = League::with_teams("LPL", teams.clone()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(77);
        league.start_new_season(&sim, &mut registry, Split::Spring, start(), &mut rng).unwrap();
        run_regular_season(&mut league, &sim, &mut registry, &mut rng);
        while !league.simulate_playoff_round(&sim, &mut registry, &mut rng).unwrap() {}

        let summer = NaiveDate::from_ymd_opt(2025, 6, 14).unwrap();
        league.start_new_season(&sim, &mut registry, Split::Summer, summer, &mut rng).unwrap();
        assert_eq!(league.season_history.len(), 1);
        assert!(league.bracket.is_none());
        assert!(league.division(PLAYOFFS).is_err());
        for team in teams {
            let record = registry.team(team).unwrap();
            assert_eq!((record.wins, record.losses, record.championship_points), (0, 0, 0));
            assert_eq!(record.season_history.len(), 1);
        }
    }

    #[test]
    fn test_seeded_seasons_replay_identically() {
        let play = || {
            let (sim, mut registry, teams) = world(6);
            let mut league = League::with_teams("LCK", teams).unwrap();
            let mut rng = ChaCha8Rng::seed_from_u64(31337);
            league.start_new_season(&sim, &mut registry, Split::Spring, start(), &mut rng).unwrap();
            run_regular_season(&mut league, &sim, &mut registry, &mut rng);
            while !league.simulate_playoff_round(&sim, &mut registry, &mut rng).unwrap() {}
            (league.champion(), serde_json::to_string(&league).unwrap())
        };
        assert_eq!(play(), play());
    }
}

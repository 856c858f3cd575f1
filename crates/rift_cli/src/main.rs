//! Rift CLI
//!
//! Seeded draft, season and tournament runs over the built-in demo world.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rift_core::data::{generate_demo_world, DEFAULT_TEAMS_PER_LEAGUE};
use rift_core::draft::auto_complete;
use rift_core::league::REGULAR_SEASON;
use rift_core::models::MatchResult;
use rift_core::{
    derive_seed, seeded, ChampionCatalogue, DraftState, Registry, SimConfig, SimRng, Simulator, Split,
    TeamId, TierListDrafter, World,
};

/// Days between the end of the regional splits and the international opening.
const WORLDS_BREAK_DAYS: i64 = 28;

#[derive(Parser)]
#[command(name = "rift")]
#[command(about = "Deterministic esports season simulator")]
#[command(version)]
struct Cli {
    /// Master seed; the same seed replays the same run
    #[arg(long, global = true, default_value_t = 2025)]
    seed: u64,

    /// YAML or JSON simulation config (falls back to RIFT_SIM_CONFIG, then defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Log level used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Draft and play one series between two demo teams
    Draft {
        /// Series length (1, 3 or 5)
        #[arg(long, default_value_t = 3)]
        best_of: u8,
    },

    /// Play one regional split through the playoffs
    Season {
        /// League code (LCK, LPL, LEC, LCS)
        #[arg(long, default_value = "LCK")]
        league: String,

        /// First match day (YYYY-MM-DD)
        #[arg(long, default_value = "2025-01-18")]
        start: NaiveDate,
    },

    /// Play every regional split, then the international tournament
    Tournament {
        /// First match day of the regional splits (YYYY-MM-DD)
        #[arg(long, default_value = "2025-06-14")]
        start: NaiveDate,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<SimConfig> {
    if let Some(path) = path {
        return SimConfig::load(path).with_context(|| format!("loading config {}", path.display()));
    }
    Ok(SimConfig::from_env()?.unwrap_or_default())
}

fn print_series(registry: &Registry, result: &MatchResult) {
    println!(
        "{} {}-{} {}  ({} min)",
        registry.team_name(result.winner),
        result.winner_score,
        result.loser_score,
        registry.team_name(result.loser),
        result.duration
    );
    if let Some(mvp) = result.mvp.and_then(|id| registry.player(id)) {
        println!("MVP: {}", mvp.name);
    }
    for event in &result.events {
        println!("  {:>2}'  {}", event.minute, event.description);
    }
}

/// Upper bound on world steps for one command, so a stalled calendar fails instead of hanging.
const MAX_STEPS: usize = 200;

/// The first two teams of the first league, blue side first.
fn draft_pair(world: &World) -> Result<(TeamId, TeamId)> {
    let teams = world.leagues.first().context("world has no leagues")?.all_teams();
    let blue = *teams.first().context("league has no teams")?;
    let red = *teams.get(1).context("league needs two teams for a draft")?;
    Ok((blue, red))
}

fn run_draft(sim: &Simulator, world: &World, seed: u64, best_of: u8, json: bool) -> Result<()> {
    let mut rng = seeded(derive_seed(seed, "draft"));
    let (blue, red) = draft_pair(world)?;

    let mut draft = DraftState::new(blue, red);
    auto_complete(&mut draft, sim.catalogue(), &TierListDrafter, &mut rng)?;

    let blue_lineup = world.registry.starting_lineup(blue)?;
    let red_lineup = world.registry.starting_lineup(red)?;
    let result =
        sim.simulate_series(&world.registry, &draft, &blue_lineup, &red_lineup, best_of, world.current_date, &mut rng)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&json!({ "draft": draft, "result": result }))?);
        return Ok(());
    }

    println!("{} (blue) vs {} (red)", world.registry.team_name(blue), world.registry.team_name(red));
    for ban in &draft.bans {
        println!("  ban  {:?}  {}", ban.side, sim.catalogue().name(ban.champion));
    }
    for pick in &draft.picks {
        println!("  pick {:?}  {:<8} {}", pick.side, pick.role.label(), sim.catalogue().name(pick.champion));
    }
    print_series(&world.registry, &result);
    Ok(())
}

/// Step the world until `done` holds.
fn step_until(sim: &Simulator, world: &mut World, rng: &mut SimRng, done: impl Fn(&World) -> bool) -> Result<()> {
    for _ in 0..MAX_STEPS {
        if done(world) {
            return Ok(());
        }
        let report = world.simulate_all_leagues(sim, rng)?;
        tracing::debug!(date = %report.date, leagues = report.leagues.len(), "step");
    }
    bail!("world did not settle within {MAX_STEPS} steps (now {})", world.current_date)
}

fn run_season(sim: &Simulator, mut world: World, seed: u64, code: &str, json: bool) -> Result<()> {
    let name = world.league(code)?.name.clone();
    world.leagues.retain(|l| l.name == name);

    let mut rng = seeded(derive_seed(seed, &name));
    world.start_season(sim, Split::Spring, &mut rng)?;
    step_until(sim, &mut world, &mut rng, World::all_leagues_finished)?;

    let league = world.league(&name)?;
    let standings = league.standings(REGULAR_SEASON, &world.registry)?;
    let champion = league.champion();

    if json {
        let teams: Vec<_> = standings
            .iter()
            .map(|row| -> Result<serde_json::Value> {
                Ok(json!({
                    "team": row.team,
                    "win_rate": world.win_rate(row.team),
                    "performance": world.team_performance(row.team)?,
                    "finances": world.financial_overview(row.team)?,
                }))
            })
            .collect::<Result<_>>()?;
        let out = json!({ "league": league.name, "season": league.season()?, "standings": standings, "teams": teams, "champion": champion });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{} {}", league.name, league.season()?.title());
    for row in &standings {
        let position = world.league_position_label(row.team)?.unwrap_or_default();
        let form = world.team_performance(row.team)?;
        println!(
            "{:>4} {:<20} {:>2}-{:<2} ({:+})  {:>5.1}%  overall {:.1}",
            position,
            world.registry.team_name(row.team),
            row.wins,
            row.losses,
            row.game_diff,
            world.win_rate(row.team),
            form.overall
        );
    }
    if let Some(champion) = champion {
        println!("Champion: {}", world.registry.team_name(champion));
    }
    Ok(())
}

fn run_tournament(sim: &Simulator, mut world: World, seed: u64, json: bool) -> Result<()> {
    let mut rng = seeded(derive_seed(seed, "worlds"));
    world.start_season(sim, Split::Summer, &mut rng)?;
    step_until(sim, &mut world, &mut rng, World::all_leagues_finished)?;

    let opening = world.current_date + chrono::Duration::days(WORLDS_BREAK_DAYS);
    world.schedule_tournament("World Championship", opening, None);
    step_until(sim, &mut world, &mut rng, |w| !w.completed_tournaments.is_empty())?;

    let done = world.completed_tournaments.first().context("tournament did not complete")?;
    let winner = done.tournament.winner.context("tournament finished without a winner")?;
    let stats = done.tournament.get_stats();
    let placements = &done.placements;

    if json {
        println!("{}", serde_json::to_string_pretty(&json!({ "stats": stats, "placements": placements }))?);
        return Ok(());
    }

    for group in &stats.groups {
        println!("Group {}", group.name);
        for row in &group.rows {
            println!("  {:<20} {}-{}  {} pts", world.registry.team_name(row.team), row.wins, row.losses, row.points);
        }
    }
    for tie in &stats.knockout {
        let name = |team: Option<TeamId>| team.map_or("TBD", |id| world.registry.team_name(id));
        println!(
            "{:<13} {} vs {}  {}",
            tie.round,
            name(tie.home),
            name(tie.away),
            tie.score.as_deref().unwrap_or("-")
        );
    }
    println!("World champion: {}", world.registry.team_name(winner));
    for placement in placements.iter().filter(|p| p.prize > 0) {
        println!(
            "  {:<16} {:<20} +{} pts  ${}",
            placement.finish.label(),
            world.registry.team_name(placement.team),
            placement.points,
            placement.prize
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("rift v{}", rift_core::VERSION);

    let config = load_config(cli.config.as_ref())?;
    config.validate()?;
    let sim = Simulator::new(Arc::new(ChampionCatalogue::standard()), config);
    let demo = generate_demo_world(DEFAULT_TEAMS_PER_LEAGUE, &mut seeded(derive_seed(cli.seed, "world")))?;
    let start = match cli.command {
        Commands::Draft { .. } => NaiveDate::from_ymd_opt(2025, 1, 18).context("invalid date")?,
        Commands::Season { start, .. } | Commands::Tournament { start } => start,
    };
    let world = World::from_demo(demo, start);

    match cli.command {
        Commands::Draft { best_of } => run_draft(&sim, &world, cli.seed, best_of, cli.json),
        Commands::Season { league, .. } => run_season(&sim, world, cli.seed, &league, cli.json),
        Commands::Tournament { .. } => run_tournament(&sim, world, cli.seed, cli.json),
    }
}

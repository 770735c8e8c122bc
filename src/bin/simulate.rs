//! Headless simulation: plays seeded games against the computer seat and
//! prints outcome tallies.
//!
//! Human seats are driven by a random player that "thinks" for a random
//! 0-15 s before each move, so timed games exercise both the quick-move
//! bonus and clock expiry.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use vanishing_ttt::{
    legal_cells, EndReason, GameRng, Outcome, PlayerId, Session, SessionConfig, TimerConfig,
};

/// Play vanishing tic-tac-toe games headlessly
#[derive(Parser, Debug)]
#[command(name = "simulate")]
#[command(about = "Play seeded vanishing tic-tac-toe games and tally outcomes", long_about = None)]
#[command(version)]
struct Args {
    /// Number of games to play
    #[arg(short, long, default_value = "100")]
    games: u32,

    /// Seed for the session and the simulated human (random when omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// TOML session config. Defaults to Player 1 vs the computer.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Game length in minutes (untimed when omitted)
    #[arg(short, long)]
    minutes: Option<u32>,

    /// Use one shared clock instead of per-player banks
    #[arg(long)]
    shared: bool,

    /// Disable the quick-move bonus
    #[arg(long)]
    no_bonus: bool,

    /// Logical milliseconds per tick
    #[arg(long, default_value = "100")]
    step_ms: u64,

    /// Give up on a game after this many ticks
    #[arg(long, default_value = "100000")]
    max_ticks: u32,
}

#[derive(Debug, Default)]
struct Tally {
    wins: [u32; 2],
    ties: u32,
    timeouts: u32,
    unfinished: u32,
    moves: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let config = build_config(&args)?;
    let step = Duration::from_millis(args.step_ms.max(1));

    let seed = args.seed.unwrap_or_else(|| GameRng::from_entropy().seed());

    let mut session = Session::start(config, seed).context("invalid session config")?;
    let mut human = GameRng::new(seed).for_context("simulated-human");
    let mut tally = Tally::default();

    info!(games = args.games, seed, "Simulation started");

    for game in 0..args.games {
        if game > 0 {
            session.reset();
        }

        let outcome = play_game(&mut session, &mut human, step, args.max_ticks)?;
        tally.moves += session.moves().len();

        match outcome {
            Some(Outcome::Winner(player)) => tally.wins[player.index()] += 1,
            Some(Outcome::Tie) => tally.ties += 1,
            None => tally.unfinished += 1,
        }
        if session.state().end_reason() == Some(EndReason::TimeExpired) {
            tally.timeouts += 1;
        }
        debug!(game, ?outcome, moves = session.moves().len(), "Game finished");
    }

    print_tally(&session, &tally, args.games);
    Ok(())
}

fn build_config(args: &Args) -> Result<SessionConfig> {
    let mut config = match &args.config {
        Some(path) => SessionConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SessionConfig::new().vs_computer(),
    };

    if let Some(minutes) = args.minutes {
        let timer = TimerConfig::minutes(minutes).with_quick_bonus(!args.no_bonus);
        config = config.with_timer(if args.shared { timer.shared() } else { timer });
    }
    Ok(config)
}

/// Drive one game to completion (or `max_ticks`).
fn play_game(
    session: &mut Session,
    human: &mut GameRng,
    step: Duration,
    max_ticks: u32,
) -> Result<Option<Outcome>> {
    let mut thinking = think_time(human);

    for _ in 0..max_ticks {
        if let Some(outcome) = session.state().outcome() {
            return Ok(Some(outcome));
        }

        let active = session.state().active_player();
        if !session.config().is_computer(active) {
            if thinking.is_zero() {
                let cells = legal_cells(session.state(), active);
                if let Some(cell) = human.choose(&cells) {
                    session.submit_move(cell.get())?;
                }
                thinking = think_time(human);
                continue;
            }
            thinking = thinking.saturating_sub(step);
        }

        session.tick(step);
    }

    Ok(session.state().outcome())
}

fn think_time(rng: &mut GameRng) -> Duration {
    Duration::from_millis(rng.gen_range_usize(0..15_000) as u64)
}

fn print_tally(session: &Session, tally: &Tally, games: u32) {
    let config = session.config();
    println!("games played:  {games}");
    for player in PlayerId::ALL {
        println!(
            "{:<14} {}",
            format!("{} wins:", config.display_name(player)),
            tally.wins[player.index()]
        );
    }
    println!("ties:          {}", tally.ties);
    println!("timeouts:      {}", tally.timeouts);
    println!("unfinished:    {}", tally.unfinished);
    if games > 0 {
        println!("avg moves:     {:.1}", tally.moves as f64 / f64::from(games));
    }
}

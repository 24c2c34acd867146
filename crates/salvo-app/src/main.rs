use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use salvo_app::autopilot::{run_headless, Autopilot};
use salvo_app::{Controller, ControllerHandle};
use salvo_core::enums::TerrainProfile;
use salvo_sim::{GameConfig, GameEngine};

/// Play a game of Salvo without a screen.
#[derive(Parser, Debug)]
#[command(name = "salvo", version, about)]
struct Args {
    /// RNG seed; the same seed replays the same game.
    #[arg(long)]
    seed: Option<u64>,
    /// Number of rounds.
    #[arg(long)]
    rounds: Option<u32>,
    /// Play with this many computer players instead of the default seats.
    #[arg(long)]
    players: Option<usize>,
    /// Terrain profile: Triangular, Flat, Jagged, Hilly or Rolling.
    #[arg(long, value_parser = parse_profile)]
    profile: Option<TerrainProfile>,
    /// Load a JSON game config. Other flags override its fields.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Give up after this many engine steps.
    #[arg(long, default_value_t = 50_000_000)]
    max_ticks: u64,
    /// Run on the wall clock through the controller thread.
    #[arg(long)]
    realtime: bool,
    /// Write the final save map to this file.
    #[arg(long)]
    save: Option<PathBuf>,
}

fn parse_profile(name: &str) -> Result<TerrainProfile, String> {
    serde_json::from_value(serde_json::Value::String(name.to_string()))
        .map_err(|_| format!("unknown terrain profile {name:?}"))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

fn load_config(args: &Args) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => GameConfig::default(),
    };
    if let Some(n) = args.players {
        config = GameConfig {
            players: GameConfig::computers_only(n, config.seed).players,
            ..config
        };
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(rounds) = args.rounds {
        config.total_rounds = rounds;
    }
    if let Some(profile) = args.profile {
        config.terrain_profile = profile;
    }
    config.validate().context("invalid game config")?;
    Ok(config)
}

/// Drive the controller thread, answering for human seats from this thread.
fn run_realtime(engine: GameEngine, seed: u64) -> Result<ControllerHandle> {
    let mut controller = Controller::spawn(engine).context("spawning controller thread")?;
    let handle = controller.handle();
    let mut pilot = Autopilot::new(seed);
    let started = std::time::Instant::now();

    while !handle.is_finished() {
        if let Some(err) = handle.last_error() {
            controller.terminate();
            bail!("controller stopped: {err}");
        }
        let now = started.elapsed().as_millis() as u64;
        let snap = handle.snapshot();
        for event in &snap.events {
            info!(?event);
        }
        let inputs = match pilot.due(now) {
            Some(release) => vec![release],
            None => pilot.on_idle(&snap, now),
        };
        for input in inputs {
            if let Err(err) = handle.send_input(input) {
                warn!(error = %err, "input rejected");
            }
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    controller.terminate();
    Ok(handle)
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = load_config(&args)?;
    let seed = config.seed;
    let engine = GameEngine::new(config).context("starting game")?;

    let save = if args.realtime {
        let handle = run_realtime(engine, seed)?;
        let snap = handle.snapshot();
        println!("{}", serde_json::to_string_pretty(&snap.leaderboard)?);
        handle.save()?
    } else {
        let mut engine = engine;
        let report = run_headless(&mut engine, &mut Autopilot::new(seed), args.max_ticks)?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        if !report.finished {
            warn!(ticks = report.ticks, "tick budget ran out before the game ended");
        }
        engine.save()?
    };

    if let Some(path) = &args.save {
        std::fs::write(path, save.to_json()?)
            .with_context(|| format!("writing save {}", path.display()))?;
        info!(path = %path.display(), "game saved");
    }
    Ok(())
}

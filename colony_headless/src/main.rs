// Headless runner for the colony simulation.
//
// Generates a world from a seed, optionally replays a JSON command script,
// steps the sim and prints the narrative log to stdout, one line per entry.
// With `--snapshot` the final `ColonySnapshot` is printed as JSON after the
// log. Diagnostics from the sim (`tracing`) go to stderr and are filtered
// with `RUST_LOG` (default `info`).
//
// Usage:
//   colony-headless [OPTIONS]
//     --seed <N>          World seed (default: 42)
//     --ticks <N>         Ticks to simulate (default: 1000)
//     --config <PATH>     GameConfig JSON (default: built-in)
//     --commands <PATH>   JSON array of SimCommand, sorted by tick
//     --snapshot          Print the final snapshot as JSON

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use colony_sim::command::SimCommand;
use colony_sim::config::GameConfig;
use colony_sim::sim::SimState;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

struct Args {
    seed: u64,
    ticks: u64,
    config: Option<PathBuf>,
    commands: Option<PathBuf>,
    snapshot: bool,
}

fn main() -> ExitCode {
    init_tracing();
    let args = parse_args();

    let config = match &args.config {
        Some(path) => match GameConfig::load(path) {
            Ok(config) => config,
            Err(err) => {
                error!(path = %path.display(), %err, "failed to load config");
                return ExitCode::FAILURE;
            }
        },
        None => GameConfig::default(),
    };

    let mut commands: Vec<SimCommand> = match &args.commands {
        Some(path) => match load_commands(path) {
            Ok(commands) => commands,
            Err(err) => {
                error!(path = %path.display(), %err, "failed to load commands");
                return ExitCode::FAILURE;
            }
        },
        None => Vec::new(),
    };
    commands.sort_by_key(|c| c.tick);

    let mut sim = SimState::with_config(args.seed, config);
    info!(
        seed = args.seed,
        ticks = args.ticks,
        pawns = sim.pawns.len(),
        structures = sim.structures.len(),
        "world ready"
    );

    let result = sim.step(&commands, args.ticks);
    for entry in &result.events {
        println!("[{:>6}] {:<7} {}", entry.tick, entry.severity, entry.message);
    }
    info!(
        tick = sim.tick,
        alive = sim.living_pawns(),
        queued = sim.job_queue.len(),
        "run finished"
    );

    if args.snapshot {
        match serde_json::to_string_pretty(&sim.snapshot()) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                error!(%err, "failed to serialize snapshot");
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn load_commands(path: &Path) -> Result<Vec<SimCommand>, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Parse command-line arguments. Uses simple `std::env::args()` matching.
fn parse_args() -> Args {
    let mut parsed = Args {
        seed: 42,
        ticks: 1000,
        config: None,
        commands: None,
        snapshot: false,
    };
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--seed" => {
                i += 1;
                parsed.seed = args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--seed requires an integer");
                    std::process::exit(1);
                });
            }
            "--ticks" => {
                i += 1;
                parsed.ticks = args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--ticks requires an integer");
                    std::process::exit(1);
                });
            }
            "--config" => {
                i += 1;
                parsed.config = args.get(i).map(PathBuf::from).or_else(|| {
                    eprintln!("--config requires a path");
                    std::process::exit(1);
                });
            }
            "--commands" => {
                i += 1;
                parsed.commands = args.get(i).map(PathBuf::from).or_else(|| {
                    eprintln!("--commands requires a path");
                    std::process::exit(1);
                });
            }
            "--snapshot" => parsed.snapshot = true,
            "--help" | "-h" => {
                println!(
                    "Usage: colony-headless [--seed N] [--ticks N] [--config PATH] \
                     [--commands PATH] [--snapshot]"
                );
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {other}");
                std::process::exit(1);
            }
        }
        i += 1;
    }

    parsed
}

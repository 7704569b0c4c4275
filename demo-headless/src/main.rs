//! Forest fire simulation driver
//!
//! Reads a configuration file, runs the fire to quiescence while reporting
//! progress, then renders the recorded snapshots in the terminal.
//!
//! # Usage
//!
//! ```bash
//! cargo run --package demo-headless -- --config config-sim.json --seed 42
//! ```
//!
//! Set `RUST_LOG=debug` for per-step counts.

mod display;
mod progress;

use clap::Parser;
use display::TerminalDisplay;
use forest_fire_core::config::DEFAULT_CONFIG_PATH;
use forest_fire_core::{run_simulation, SimulationConfig};
use progress::ProgressBar;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Stochastic forest fire simulation
#[derive(Parser, Debug)]
#[command(name = "forest-fire")]
#[command(about = "Grid wildfire spread simulation", long_about = None)]
struct Args {
    /// Path to the JSON configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Random seed (overrides the configuration file)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Show only the first and final states
    #[arg(long)]
    no_animation: bool,

    /// Suppress progress bar and report
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = SimulationConfig::load(&args.config)?;
    let forest = config.build_forest()?;
    let show_logs = config.display.console_logs && !args.quiet;

    let seed = args
        .seed
        .or(config.seed)
        .unwrap_or_else(|| rand::rng().random());
    info!("Using seed {seed}");
    let mut rng = StdRng::seed_from_u64(seed);

    let mut progress = ProgressBar::new(io::stdout(), show_logs);
    let history = run_simulation(forest, &mut rng, &mut progress);
    progress.finish()?;

    progress::announce_display(show_logs);
    let display = TerminalDisplay::new(&config.display, config.forest.width);
    let mut stdout = io::stdout().lock();
    if config.display.play_animation && !args.no_animation {
        display.play(&history, &mut stdout)?;
    } else {
        display.show_start_and_final(&history, &mut stdout)?;
    }

    progress::announce_end(show_logs);
    Ok(())
}

//! Cadence CLI - Command-line interface for the Cadence frame dispatcher

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{phases, simulate};

#[derive(Parser)]
#[command(name = "cadence")]
#[command(about = "Centralized per-frame callback dispatch", long_about = None)]
#[command(version)]
struct Cli {
    /// Log registration and eviction events
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a headless frame loop over synthetic targets and report dispatch stats
    Simulate {
        /// Number of targets, spread round-robin across phases
        #[arg(short, long, default_value = "1000")]
        targets: usize,

        /// Number of frames to run
        #[arg(short, long, default_value = "600")]
        frames: u64,

        /// Simulated frame time in seconds
        #[arg(long, default_value = "0.016666")]
        frame_time: f64,

        /// Destroy the host of every Nth target halfway through the run
        #[arg(long)]
        destroy_every: Option<usize>,

        /// Only register targets for these phases (e.g. update,fixed_update)
        #[arg(long, value_delimiter = ',')]
        phases: Vec<cadence_core::Phase>,

        /// Path to a dispatcher config TOML file
        #[arg(long)]
        config: Option<String>,
    },

    /// List the frame phases in the order a frame runs them
    Phases,
}

/// Log level for the dispatcher's verbose setting
fn log_level(verbose: bool) -> log::LevelFilter {
    if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    }
}

/// Initialize logging; verbose raises the level to debug
pub(crate) fn init_logging(verbose: bool) {
    use env_logger::Builder;
    use std::io::Write;

    Builder::new()
        .filter_level(log_level(verbose))
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            targets,
            frames,
            frame_time,
            destroy_every,
            phases,
            config,
        } => simulate::run(simulate::SimulateArgs {
            targets,
            frames,
            frame_time,
            destroy_every,
            phases,
            config,
            verbose: cli.verbose,
        }),
        Commands::Phases => {
            init_logging(cli.verbose);
            phases::run()
        }
    }
}

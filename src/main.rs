//! Conquest CLI - play interactively or simulate batches of games.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod cli;

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Conquest - a single-player territory conquest game with secret missions
#[derive(Parser, Debug)]
#[command(name = "conquest")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play a game in the terminal
    Play {
        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Force a mission (1-3) instead of drawing one
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=3))]
        mission: Option<u8>,

        /// Re-prompt after an invalid territory instead of cancelling the attack
        #[arg(long)]
        retry_invalid: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Run many games with a scripted greedy player
    Simulate {
        /// Number of games to play
        #[arg(short, long, default_value = "1000")]
        games: u64,

        /// Seed of the first game (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Turns after which the scripted player gives up
        #[arg(long, default_value = "200")]
        max_turns: u32,

        /// Force a mission (1-3) for every game
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=3))]
        mission: Option<u8>,

        /// Number of threads (default: all cores)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::SimulateFormat,

        /// Show a progress bar
        #[arg(long)]
        progress: bool,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let result = match args.command {
        Commands::Play {
            seed,
            mission,
            retry_invalid,
            no_color,
        } => cli::play::execute(seed, mission, retry_invalid, no_color),

        Commands::Simulate {
            games,
            seed,
            max_turns,
            mission,
            threads,
            format,
            progress,
        } => cli::simulate::execute(cli::simulate::SimulateArgs {
            games,
            seed,
            max_turns,
            mission,
            threads,
            format,
            progress,
        }),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

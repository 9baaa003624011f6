//! Simulate command implementation.

use super::output::{format_simulation_csv, format_simulation_text, JsonSimulationResult};
use super::{parse_mission, seed_or_random, CliError, SimulateFormat};
use conquest::autoplay::{run_game, BatchStats, SimulationConfig};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::time::Instant;

/// Flags of the simulate command.
#[derive(Debug)]
pub(crate) struct SimulateArgs {
    pub(crate) games: u64,
    pub(crate) seed: Option<u64>,
    pub(crate) max_turns: u32,
    pub(crate) mission: Option<u8>,
    pub(crate) threads: Option<usize>,
    pub(crate) format: SimulateFormat,
    pub(crate) progress: bool,
}

/// Execute the simulate command.
///
/// # Errors
///
/// Returns an error if a game cannot be set up or output fails.
pub(crate) fn execute(args: SimulateArgs) -> Result<(), CliError> {
    let config = SimulationConfig {
        max_turns: args.max_turns,
        mission: parse_mission(args.mission)?,
    };

    // Set thread pool size if specified
    if let Some(num_threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let base_seed = seed_or_random(args.seed);

    // Progress bar
    let pb = if args.progress {
        let pb = ProgressBar::new(args.games);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} games ({per_sec})")
            .map_err(|e| CliError::new(format!("Invalid progress template: {e}")))?
            .progress_chars("=>-");
        pb.set_style(style);
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();

    // Each thread accumulates into its own BatchStats, then we merge at the end
    let stats = (0..args.games)
        .into_par_iter()
        .map(|i| run_game(base_seed.wrapping_add(i), config))
        .try_fold(BatchStats::default, |mut local_stats, result| {
            local_stats.add_result(&result?);
            Ok::<_, conquest::SetupError>(local_stats)
        })
        .try_reduce(BatchStats::default, |mut a, b| {
            a.merge(&b);
            Ok(a)
        })?;

    if let Some(pb) = pb {
        pb.set_position(stats.games_played);
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();
    tracing::info!(
        games = stats.games_played,
        elapsed_ms = duration.as_millis(),
        "simulation finished"
    );

    #[allow(clippy::cast_precision_loss)]
    let games_per_sec = if duration.as_secs_f64() > 0.0 {
        stats.games_played as f64 / duration.as_secs_f64()
    } else {
        0.0
    };

    match args.format {
        SimulateFormat::Text => {
            println!();
            print!("{}", format_simulation_text(&stats, base_seed));
            println!();
            println!(
                "Duration: {:.2}s ({games_per_sec:.0} games/sec)",
                duration.as_secs_f64()
            );
        }
        SimulateFormat::Json => {
            let json_result = JsonSimulationResult::from_stats(&stats, base_seed);
            let json = serde_json::to_string_pretty(&json_result)
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
        SimulateFormat::Csv => {
            print!("{}", format_simulation_csv(&stats));
        }
    }

    Ok(())
}

//! Output formatting utilities for CLI.

use conquest::autoplay::BatchStats;
use conquest::game::MISSIONS;
use serde::Serialize;

/// JSON-serializable simulation summary.
#[derive(Debug, Serialize)]
pub(super) struct JsonSimulationResult {
    /// Seed of the first game.
    first_seed: u64,
    /// Total games played.
    games_played: u64,
    /// Games won.
    wins: u64,
    /// Win rate (0.0-1.0).
    win_rate: f64,
    /// Games that ran out of attackers.
    stalled: u64,
    /// Games that hit the turn cap.
    turn_limit: u64,
    /// Average captures per game.
    avg_captures: f64,
    /// Per-mission statistics.
    missions: Vec<JsonMissionStats>,
}

/// JSON-serializable per-mission stats.
#[derive(Debug, Serialize)]
pub(super) struct JsonMissionStats {
    /// Mission id (1-3).
    id: u8,
    /// Mission briefing.
    description: String,
    /// Games played with this mission.
    games: u64,
    /// Games won.
    wins: u64,
    /// Win rate (0.0-1.0).
    win_rate: f64,
    /// Mean turns of won games (null if none won).
    mean_turns_to_win: Option<f64>,
}

impl JsonSimulationResult {
    /// Create from stats.
    pub(super) fn from_stats(stats: &BatchStats, first_seed: u64) -> Self {
        let missions = MISSIONS
            .iter()
            .map(|&mission| {
                let m = stats.mission(mission);
                JsonMissionStats {
                    id: mission.id(),
                    description: mission.description(),
                    games: m.games,
                    wins: m.wins,
                    win_rate: m.win_rate(),
                    mean_turns_to_win: m.mean_turns_to_win(),
                }
            })
            .collect();

        Self {
            first_seed,
            games_played: stats.games_played,
            wins: stats.wins,
            win_rate: stats.win_rate(),
            stalled: stats.stalled,
            turn_limit: stats.turn_limit,
            avg_captures: avg_captures(stats),
            missions,
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn avg_captures(stats: &BatchStats) -> f64 {
    if stats.games_played == 0 {
        return 0.0;
    }
    stats.captures as f64 / stats.games_played as f64
}

#[allow(clippy::cast_precision_loss)]
fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

/// Format simulation stats as human-readable text.
pub(super) fn format_simulation_text(stats: &BatchStats, first_seed: u64) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Simulation Results ({} games, first seed {first_seed})\n",
        stats.games_played
    ));
    output.push_str("========================================\n\n");

    output.push_str("Endings:\n");
    output.push_str(&format!(
        "  Won:        {} ({:.1}%)\n",
        stats.wins,
        stats.win_rate() * 100.0
    ));
    output.push_str(&format!(
        "  Stalled:    {} ({:.1}%)\n",
        stats.stalled,
        percent(stats.stalled, stats.games_played)
    ));
    output.push_str(&format!(
        "  Turn limit: {} ({:.1}%)\n\n",
        stats.turn_limit,
        percent(stats.turn_limit, stats.games_played)
    ));

    output.push_str("By Mission:\n");
    for mission in MISSIONS {
        let m = stats.mission(mission);
        let turns = m
            .mean_turns_to_win()
            .map_or_else(|| "-".to_string(), |t| format!("{t:.1}"));
        output.push_str(&format!(
            "  {mission}\n    {:.1}% won ({} of {}), mean turns to win: {turns}\n",
            m.win_rate() * 100.0,
            m.wins,
            m.games
        ));
    }

    output.push_str(&format!(
        "\nAverage Captures: {:.2} per game\n",
        avg_captures(stats)
    ));

    output
}

/// Format simulation stats as CSV.
pub(super) fn format_simulation_csv(stats: &BatchStats) -> String {
    let mut output = String::new();

    // Header
    output.push_str("mission,games,wins,win_rate,mean_turns_to_win\n");

    // Data rows
    for mission in MISSIONS {
        let m = stats.mission(mission);
        let turns = m
            .mean_turns_to_win()
            .map_or_else(String::new, |t| format!("{t:.2}"));
        output.push_str(&format!(
            "{},{},{},{:.4},{turns}\n",
            mission.id(),
            m.games,
            m.wins,
            m.win_rate()
        ));
    }

    output
}

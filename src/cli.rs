//! CLI command implementations for Conquest.

pub(crate) mod play;
pub(crate) mod simulate;

mod output;

use clap::ValueEnum;
use conquest::{Mission, SetupError};
use std::error::Error;
use std::fmt;

/// Output format for the `simulate` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum SimulateFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// CSV format.
    Csv,
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<SetupError> for CliError {
    fn from(e: SetupError) -> Self {
        Self::new(format!("Game setup failed: {e}"))
    }
}

/// Resolve a `--mission` flag.
fn parse_mission(id: Option<u8>) -> Result<Option<Mission>, CliError> {
    id.map(|id| Mission::from_id(id).ok_or_else(|| CliError::new(format!("Unknown mission id {id}"))))
        .transpose()
}

/// Seed to use when none was given.
fn seed_or_random(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(rand::random)
}

// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Conquest: a deterministic single-player territory conquest game.
//!
//! The player controls one faction on a ten-territory map, attacks enemy
//! territories with single-die combat rounds, and wins by checking a secret
//! mission once it is complete.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   CLI (play / simulate)             │
//! ├─────────────────────────────────────┤
//! │   Turn Controller  ←→  Console      │
//! ├─────────────────────────────────────┤
//! │   Map · Combat · Missions           │
//! ├─────────────────────────────────────┤
//! │   RandomSource (seeded ChaCha)      │
//! └─────────────────────────────────────┘
//! ```
//!
//! All randomness flows through [`dice::RandomSource`], so a game is fully
//! reproducible from its seed and its input.

pub mod autoplay;
pub mod dice;
pub mod error;
pub mod game;

pub use error::{AttackError, SetupError};

// Re-export key game types at crate root for convenience
pub use dice::{GameRng, RandomSource};
pub use game::{
    Console, Faction, GameConfig, GameOutcome, GameState, Map, Mission, Territory, TerritoryId,
    TurnController,
};

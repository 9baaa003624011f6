//! Game layer for Conquest.
//!
//! Implements the rules of a single-player conquest game:
//! - Map of ten territories with a fixed starting allocation
//! - Single-die combat rounds with capture
//! - Secret missions and victory evaluation
//! - Turn controller driving the game through a [`Console`]

mod combat;
mod controller;
mod faction;
mod invariants;
mod map;
mod mission;
mod state;

pub use combat::{
    resolve_attack, validate_attacker, validate_defender, CombatReport, RoundWinner,
    MIN_ATTACKING_TROOPS, OCCUPYING_TROOPS,
};
pub use controller::{
    Action, Console, Ending, GameEvent, GameOutcome, Prompt, TurnController, ACTION_PROMPT,
    ATTACKER_PROMPT, DEFENDER_PROMPT,
};
pub use faction::Faction;
pub use invariants::{assert_invariants, check_invariants, InvariantViolation, SANITY_MAX_TROOPS};
pub use map::{Map, Territory, TerritoryId, MIN_TERRITORIES, TERRITORY_COUNT};
pub use mission::{evaluate_by_id, Mission, MissionProgress, MISSIONS, MISSION_COUNT};
pub use state::{ControllerConfig, GameConfig, GameState, MissionCheck, Phase};

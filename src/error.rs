//! Error types for game setup and attack validation.

use thiserror::Error;

use crate::game::TerritoryId;

/// Failures that prevent a game from starting.
///
/// These are the only fatal conditions: the binary reports them and exits
/// with a non-zero status before any turn is played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SetupError {
    /// The allocation rule needs the player band plus the target-enemy slot.
    #[error("cannot build a map of {requested} territories (minimum is {minimum})")]
    TooFewTerritories {
        /// Number of territories asked for.
        requested: usize,
        /// Smallest count the allocation rule supports.
        minimum: usize,
    },
}

/// Reasons an attack selection is rejected.
///
/// A rejected attack never mutates the map. The display text is shown to the
/// player as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AttackError {
    /// Attacker id is outside `1..=count`.
    #[error("attacker id {id} is out of range (1 to {count})")]
    AttackerOutOfRange {
        /// Id entered by the player.
        id: i64,
        /// Number of territories on the map.
        count: usize,
    },
    /// The attacking territory belongs to someone else.
    #[error("territory {0} is not yours")]
    AttackerNotOwned(TerritoryId),
    /// The attacking territory cannot spare a troop.
    #[error("territory {id} has {troops} troop(s), at least {required} are needed to attack")]
    InsufficientTroops {
        /// Attacking territory.
        id: TerritoryId,
        /// Troops currently stationed there.
        troops: u32,
        /// Minimum troops required to launch an attack.
        required: u32,
    },
    /// Defender id is outside `1..=count`.
    #[error("defender id {id} is out of range (1 to {count})")]
    DefenderOutOfRange {
        /// Id entered by the player.
        id: i64,
        /// Number of territories on the map.
        count: usize,
    },
    /// Attacker and defender are the same territory.
    #[error("territory {0} cannot attack itself")]
    SameTerritory(TerritoryId),
    /// The defending territory already belongs to the player.
    #[error("you cannot attack your own territory {0}")]
    DefenderOwnedByPlayer(TerritoryId),
    /// The game already ended.
    #[error("the game is over")]
    GameOver,
}

//! Factions that can own territories.

use std::fmt;

use serde::Serialize;

/// A side that can control territories.
///
/// The set is closed: the player's army, the enemy the destroy mission
/// targets, and two generic enemies that only ever defend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Faction {
    /// The human player's army.
    Blue,
    /// The target enemy of the destroy mission.
    Black,
    /// Generic enemy.
    Yellow,
    /// Generic enemy.
    Green,
}

impl Faction {
    /// The faction controlled by the human player.
    pub const PLAYER: Faction = Faction::Blue;

    /// The enemy the destroy mission asks the player to eliminate.
    pub const TARGET: Faction = Faction::Black;

    /// Enemies placed on the territories past the target slot.
    pub const OTHER_ENEMIES: [Faction; 2] = [Faction::Yellow, Faction::Green];

    /// Upper-case display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Faction::Blue => "BLUE",
            Faction::Black => "BLACK",
            Faction::Yellow => "YELLOW",
            Faction::Green => "GREEN",
        }
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

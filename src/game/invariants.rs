//! Game invariants - sanity checks that detect bugs.
//!
//! These should never trigger in a correctly implemented game. They are not
//! gameplay rules; the controller logs violations in debug builds and the
//! tests and fuzz targets assert there are none.

use std::collections::HashSet;

use crate::game::{GameState, Phase};

/// Sanity bound: no territory should ever hold more troops than this.
/// Nothing in the game adds troops, so the starting maximum is generous.
pub const SANITY_MAX_TROOPS: u32 = 6;

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all game invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(state: &GameState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let player = state.player();

    let mut names = HashSet::new();
    for (id, territory) in state.map().iter() {
        if territory.name().is_empty() {
            violations.push(InvariantViolation {
                message: format!("Territory {id} has an empty name"),
            });
        }
        if !names.insert(territory.name()) {
            violations.push(InvariantViolation {
                message: format!("Territory {id} reuses the name {:?}", territory.name()),
            });
        }

        // Captures always leave one troop behind, so only the player can be
        // left with an empty territory (an attacker that just moved out).
        if territory.owner != player && territory.troops == 0 {
            violations.push(InvariantViolation {
                message: format!(
                    "Territory {id} held by {} has no troops",
                    territory.owner
                ),
            });
        }

        if territory.troops > SANITY_MAX_TROOPS {
            violations.push(InvariantViolation {
                message: format!(
                    "Territory {id} has {} troops > sanity max {SANITY_MAX_TROOPS}",
                    territory.troops
                ),
            });
        }
    }

    // A won game must actually satisfy the mission it was won with.
    if state.phase() == Phase::Won && !state.mission().evaluate(state.map(), player) {
        violations.push(InvariantViolation {
            message: format!("Game marked won but {:?} is not complete", state.mission()),
        });
    }

    violations
}

/// Assert all game invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(state: &GameState) {
    let violations = check_invariants(state);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Game invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_state: &GameState) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::GameRng;
    use crate::game::{Faction, GameConfig, Map, Mission, Territory};

    fn create_game(territories: Vec<Territory>) -> GameState {
        GameState::from_parts(Map::from_territories(territories), Mission::ConquerSix)
    }

    #[test]
    fn test_fresh_games_pass() {
        for seed in 0..50 {
            let mut rng = GameRng::seeded(seed);
            let game = GameState::new(GameConfig::default(), &mut rng).unwrap();
            let violations = check_invariants(&game);
            assert!(violations.is_empty(), "seed {seed}: {violations:?}");
        }
    }

    #[test]
    fn test_empty_player_territory_is_allowed() {
        let game = create_game(vec![
            Territory::new("A", Faction::Blue, 0),
            Territory::new("B", Faction::Blue, 1),
        ]);
        assert!(check_invariants(&game).is_empty());
    }

    #[test]
    fn test_empty_enemy_territory_detected() {
        let game = create_game(vec![
            Territory::new("A", Faction::Blue, 3),
            Territory::new("B", Faction::Green, 0),
        ]);
        let violations = check_invariants(&game);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("no troops"));
    }

    #[test]
    fn test_duplicate_name_detected() {
        let game = create_game(vec![
            Territory::new("A", Faction::Blue, 3),
            Territory::new("A", Faction::Green, 2),
        ]);
        let violations = check_invariants(&game);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("reuses"));
    }

    #[test]
    fn test_excessive_troops_detected() {
        let game = create_game(vec![Territory::new(
            "A",
            Faction::Black,
            SANITY_MAX_TROOPS + 1,
        )]);
        let violations = check_invariants(&game);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("sanity max"));
    }

    #[test]
    fn test_troops_exactly_at_max_passes() {
        let game = create_game(vec![Territory::new("A", Faction::Black, SANITY_MAX_TROOPS)]);
        assert!(check_invariants(&game).is_empty());
    }

    #[test]
    #[should_panic(expected = "Game invariant violations")]
    #[cfg(debug_assertions)]
    fn test_assert_invariants_panics() {
        let game = create_game(vec![Territory::new("", Faction::Green, 1)]);
        assert_invariants(&game);
    }
}

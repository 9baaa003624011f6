//! Combat resolution.
//!
//! One attack is one round: each side rolls a single die, the higher roll
//! kills one enemy troop, and ties go to the defender. A defender reduced to
//! zero troops is captured.

use serde::Serialize;

use crate::dice::RandomSource;
use crate::error::AttackError;
use crate::game::{Faction, Map, Territory, TerritoryId};

/// Minimum troops a territory needs before it may attack.
pub const MIN_ATTACKING_TROOPS: u32 = 2;

/// Troops left behind in a freshly captured territory.
pub const OCCUPYING_TROOPS: u32 = 1;

/// Side that won the dice comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundWinner {
    /// Attacker rolled strictly higher.
    Attacker,
    /// Defender rolled higher or equal.
    Defender,
}

/// Outcome of a single attack round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CombatReport {
    /// Attacker's die.
    pub attacker_roll: u32,
    /// Defender's die.
    pub defender_roll: u32,
    /// Who won the comparison.
    pub winner: RoundWinner,
    /// Whether the defending territory changed hands.
    pub captured: bool,
    /// Attacker troops after the round.
    pub attacker_troops: u32,
    /// Defender troops after the round.
    pub defender_troops: u32,
}

/// Resolve one round of combat between two territories.
///
/// Performs no validation; callers check ownership and troop counts first
/// (see [`validate_attacker`] and [`validate_defender`]). On capture the
/// defender switches to `player` and keeps exactly one troop, and the
/// attacker pays one extra troop for the move. The attacker may end at 0.
pub fn resolve_attack<R: RandomSource + ?Sized>(
    attacker: &mut Territory,
    defender: &mut Territory,
    player: Faction,
    rng: &mut R,
) -> CombatReport {
    let attacker_roll = rng.roll_die();
    let defender_roll = rng.roll_die();

    let winner = if attacker_roll > defender_roll {
        defender.troops = defender.troops.saturating_sub(1);
        RoundWinner::Attacker
    } else {
        attacker.troops = attacker.troops.saturating_sub(1);
        RoundWinner::Defender
    };

    tracing::debug!(
        attacker = attacker.name(),
        defender = defender.name(),
        attacker_roll,
        defender_roll,
        ?winner,
        "combat round"
    );

    let captured = defender.troops == 0;
    if captured {
        defender.owner = player;
        attacker.troops = attacker.troops.saturating_sub(1);
        defender.troops = OCCUPYING_TROOPS;
        tracing::info!(
            territory = defender.name(),
            new_owner = %player,
            "territory captured"
        );
    }

    CombatReport {
        attacker_roll,
        defender_roll,
        winner,
        captured,
        attacker_troops: attacker.troops,
        defender_troops: defender.troops,
    }
}

/// Check a player's choice of attacking territory.
///
/// Returns the 0-based index of the attacker.
///
/// # Errors
///
/// Fails if the selection is out of range, not owned by `player`, or holds
/// fewer than [`MIN_ATTACKING_TROOPS`].
pub fn validate_attacker(map: &Map, selection: i64, player: Faction) -> Result<usize, AttackError> {
    let index = map
        .index_of(selection)
        .ok_or(AttackError::AttackerOutOfRange {
            id: selection,
            count: map.len(),
        })?;
    let id = TerritoryId::from_index(index);
    let territory = map.at(index).ok_or(AttackError::AttackerOutOfRange {
        id: selection,
        count: map.len(),
    })?;

    if territory.owner != player {
        return Err(AttackError::AttackerNotOwned(id));
    }
    if territory.troops < MIN_ATTACKING_TROOPS {
        return Err(AttackError::InsufficientTroops {
            id,
            troops: territory.troops,
            required: MIN_ATTACKING_TROOPS,
        });
    }
    Ok(index)
}

/// Check a player's choice of defending territory.
///
/// Returns the 0-based index of the defender.
///
/// # Errors
///
/// Fails if the selection is out of range, is the attacker itself, or is
/// already owned by `player`.
pub fn validate_defender(
    map: &Map,
    attacker: usize,
    selection: i64,
    player: Faction,
) -> Result<usize, AttackError> {
    let index = map
        .index_of(selection)
        .ok_or(AttackError::DefenderOutOfRange {
            id: selection,
            count: map.len(),
        })?;
    let id = TerritoryId::from_index(index);

    if index == attacker {
        return Err(AttackError::SameTerritory(id));
    }
    let territory = map.at(index).ok_or(AttackError::DefenderOutOfRange {
        id: selection,
        count: map.len(),
    })?;
    if territory.owner == player {
        return Err(AttackError::DefenderOwnedByPlayer(id));
    }
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::SequenceSource;

    fn pair(attacker_troops: u32, defender_troops: u32) -> (Territory, Territory) {
        (
            Territory::new("Attacker", Faction::PLAYER, attacker_troops),
            Territory::new("Defender", Faction::TARGET, defender_troops),
        )
    }

    fn test_map() -> Map {
        Map::from_territories(vec![
            Territory::new("Territory 1", Faction::Blue, 4),
            Territory::new("Territory 2", Faction::Blue, 1),
            Territory::new("Territory 3", Faction::Black, 3),
            Territory::new("Territory 4", Faction::Green, 2),
            Territory::new("Territory 5", Faction::Yellow, 2),
        ])
    }

    #[test]
    fn test_attacker_wins_round() {
        let (mut att, mut def) = pair(4, 3);
        let mut dice = SequenceSource::dice(&[5, 2]);
        let report = resolve_attack(&mut att, &mut def, Faction::PLAYER, &mut dice);

        assert_eq!(report.winner, RoundWinner::Attacker);
        assert!(!report.captured);
        assert_eq!(att.troops, 4);
        assert_eq!(def.troops, 2);
        assert_eq!(def.owner, Faction::TARGET);
    }

    #[test]
    fn test_defender_wins_round() {
        let (mut att, mut def) = pair(4, 3);
        let mut dice = SequenceSource::dice(&[2, 5]);
        let report = resolve_attack(&mut att, &mut def, Faction::PLAYER, &mut dice);

        assert_eq!(report.winner, RoundWinner::Defender);
        assert_eq!(att.troops, 3);
        assert_eq!(def.troops, 3);
    }

    #[test]
    fn test_tie_goes_to_defender() {
        for face in 1..=6 {
            let (mut att, mut def) = pair(4, 1);
            let mut dice = SequenceSource::dice(&[face, face]);
            let report = resolve_attack(&mut att, &mut def, Faction::PLAYER, &mut dice);

            assert_eq!(report.winner, RoundWinner::Defender, "tie on {face}");
            assert!(!report.captured);
            assert_eq!(att.troops, 3);
            assert_eq!(def.troops, 1);
        }
    }

    #[test]
    fn test_capture_resets_defender_to_one() {
        let (mut att, mut def) = pair(4, 1);
        let mut dice = SequenceSource::dice(&[6, 1]);
        let report = resolve_attack(&mut att, &mut def, Faction::PLAYER, &mut dice);

        assert!(report.captured);
        assert_eq!(def.owner, Faction::PLAYER);
        assert_eq!(def.troops, OCCUPYING_TROOPS);
        assert_eq!(att.troops, 3);
        assert_eq!(report.attacker_troops, 3);
        assert_eq!(report.defender_troops, 1);
    }

    #[test]
    fn test_capture_can_empty_attacker() {
        let (mut att, mut def) = pair(1, 1);
        let mut dice = SequenceSource::dice(&[6, 1]);
        let report = resolve_attack(&mut att, &mut def, Faction::PLAYER, &mut dice);

        assert!(report.captured);
        assert_eq!(att.troops, 0);
    }

    #[test]
    fn test_validate_attacker() {
        let map = test_map();
        assert_eq!(validate_attacker(&map, 1, Faction::Blue), Ok(0));
        assert_eq!(
            validate_attacker(&map, 0, Faction::Blue),
            Err(AttackError::AttackerOutOfRange { id: 0, count: 5 })
        );
        assert_eq!(
            validate_attacker(&map, 6, Faction::Blue),
            Err(AttackError::AttackerOutOfRange { id: 6, count: 5 })
        );
        assert_eq!(
            validate_attacker(&map, 3, Faction::Blue),
            Err(AttackError::AttackerNotOwned(TerritoryId::new(3)))
        );
        assert_eq!(
            validate_attacker(&map, 2, Faction::Blue),
            Err(AttackError::InsufficientTroops {
                id: TerritoryId::new(2),
                troops: 1,
                required: 2
            })
        );
    }

    #[test]
    fn test_validate_defender() {
        let map = test_map();
        assert_eq!(validate_defender(&map, 0, 3, Faction::Blue), Ok(2));
        assert_eq!(
            validate_defender(&map, 0, 1, Faction::Blue),
            Err(AttackError::SameTerritory(TerritoryId::new(1)))
        );
        assert_eq!(
            validate_defender(&map, 0, 2, Faction::Blue),
            Err(AttackError::DefenderOwnedByPlayer(TerritoryId::new(2)))
        );
        assert_eq!(
            validate_defender(&map, 0, 42, Faction::Blue),
            Err(AttackError::DefenderOutOfRange { id: 42, count: 5 })
        );
    }
}

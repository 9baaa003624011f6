//! Secret missions and victory evaluation.

use std::fmt;

use serde::Serialize;

use crate::dice::RandomSource;
use crate::game::{Faction, Map};

/// Number of distinct missions.
pub const MISSION_COUNT: usize = 3;

/// The player's private win condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mission {
    /// Hold at least six territories.
    ConquerSix,
    /// Leave the target enemy with no territory.
    DestroyTargetFaction,
    /// Hold at least eight territories.
    ConquerEight,
}

/// All missions, in id order.
pub const MISSIONS: [Mission; MISSION_COUNT] = [
    Mission::ConquerSix,
    Mission::DestroyTargetFaction,
    Mission::ConquerEight,
];

impl Mission {
    /// Draw a mission uniformly at random.
    #[allow(clippy::cast_possible_truncation)]
    pub fn assign<R: RandomSource + ?Sized>(rng: &mut R) -> Self {
        let mission = MISSIONS[rng.below(MISSION_COUNT as u32) as usize];
        tracing::info!(?mission, "mission assigned");
        mission
    }

    /// Look a mission up by its 1-based id.
    #[must_use]
    pub const fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Mission::ConquerSix),
            2 => Some(Mission::DestroyTargetFaction),
            3 => Some(Mission::ConquerEight),
            _ => None,
        }
    }

    /// The 1-based id shown to the player.
    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Mission::ConquerSix => 1,
            Mission::DestroyTargetFaction => 2,
            Mission::ConquerEight => 3,
        }
    }

    /// Mission briefing text.
    #[must_use]
    pub fn description(self) -> String {
        match self {
            Mission::ConquerSix => "Conquer 6 territories in total.".to_string(),
            Mission::DestroyTargetFaction => {
                format!("Completely destroy the {} army.", Faction::TARGET)
            }
            Mission::ConquerEight => "Conquer 8 territories in total.".to_string(),
        }
    }

    /// Whether the mission is accomplished on `map`.
    #[must_use]
    pub fn evaluate(self, map: &Map, player: Faction) -> bool {
        MissionProgress::scan(map, player).satisfies(self)
    }
}

impl fmt::Display for Mission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ID {}: {}", self.id(), self.description())
    }
}

/// What a single pass over the map learns about mission progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MissionProgress {
    /// Territories held by the player.
    pub player_territories: usize,
    /// Whether the target enemy still holds any territory.
    pub target_present: bool,
}

impl MissionProgress {
    /// Scan the map once.
    #[must_use]
    pub fn scan(map: &Map, player: Faction) -> Self {
        let mut progress = Self {
            player_territories: 0,
            target_present: false,
        };
        for territory in map.territories() {
            if territory.owner == player {
                progress.player_territories += 1;
            }
            if territory.owner == Faction::TARGET {
                progress.target_present = true;
            }
        }
        progress
    }

    /// Whether this progress completes `mission`.
    #[must_use]
    pub const fn satisfies(self, mission: Mission) -> bool {
        match mission {
            Mission::ConquerSix => self.player_territories >= 6,
            Mission::DestroyTargetFaction => !self.target_present,
            Mission::ConquerEight => self.player_territories >= 8,
        }
    }
}

/// Evaluate a mission given by raw id.
///
/// Unknown ids are never satisfied.
#[must_use]
pub fn evaluate_by_id(map: &Map, mission_id: u8, player: Faction) -> bool {
    Mission::from_id(mission_id).is_some_and(|mission| mission.evaluate(map, player))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::SequenceSource;
    use crate::game::Territory;

    /// Map where the player owns `owned` of ten territories and the target
    /// enemy owns `target` of the rest.
    fn map_with(owned: usize, target: usize) -> Map {
        let territories = (0..10)
            .map(|i| {
                let owner = if i < owned {
                    Faction::Blue
                } else if i < owned + target {
                    Faction::Black
                } else {
                    Faction::Green
                };
                Territory::new(format!("Territory {}", i + 1), owner, 2)
            })
            .collect();
        Map::from_territories(territories)
    }

    #[test]
    fn test_assign_covers_all_missions() {
        let mut source = SequenceSource::new(vec![0, 1, 2]);
        assert_eq!(Mission::assign(&mut source), Mission::ConquerSix);
        assert_eq!(Mission::assign(&mut source), Mission::DestroyTargetFaction);
        assert_eq!(Mission::assign(&mut source), Mission::ConquerEight);
    }

    #[test]
    fn test_conquer_six_boundary() {
        assert!(!Mission::ConquerSix.evaluate(&map_with(5, 1), Faction::Blue));
        assert!(Mission::ConquerSix.evaluate(&map_with(6, 1), Faction::Blue));
    }

    #[test]
    fn test_conquer_eight_boundary() {
        assert!(!Mission::ConquerEight.evaluate(&map_with(7, 0), Faction::Blue));
        assert!(Mission::ConquerEight.evaluate(&map_with(8, 0), Faction::Blue));
    }

    #[test]
    fn test_destroy_target_boundary() {
        let mission = Mission::DestroyTargetFaction;
        assert!(!mission.evaluate(&map_with(4, 1), Faction::Blue));
        assert!(mission.evaluate(&map_with(4, 0), Faction::Blue));
    }

    #[test]
    fn test_destroy_ignores_player_count() {
        // Target gone while the player holds very little still wins.
        assert!(Mission::DestroyTargetFaction.evaluate(&map_with(1, 0), Faction::Blue));
    }

    #[test]
    fn test_unknown_id_is_never_satisfied() {
        let map = map_with(10, 0);
        assert!(evaluate_by_id(&map, 1, Faction::Blue));
        assert!(!evaluate_by_id(&map, 0, Faction::Blue));
        assert!(!evaluate_by_id(&map, 4, Faction::Blue));
    }

    #[test]
    fn test_id_round_trip() {
        for mission in MISSIONS {
            assert_eq!(Mission::from_id(mission.id()), Some(mission));
        }
    }

    #[test]
    fn test_progress_scan() {
        let progress = MissionProgress::scan(&map_with(3, 2), Faction::Blue);
        assert_eq!(progress.player_territories, 3);
        assert!(progress.target_present);
    }

    #[test]
    fn test_description_names_target() {
        assert!(Mission::DestroyTargetFaction.description().contains("BLACK"));
        assert_eq!(
            Mission::ConquerSix.to_string(),
            "ID 1: Conquer 6 territories in total."
        );
    }
}

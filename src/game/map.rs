//! Territories and the fixed-size world map.

use std::fmt;

use serde::Serialize;

use crate::dice::RandomSource;
use crate::error::SetupError;
use crate::game::Faction;

/// Number of territories on the game map.
pub const TERRITORY_COUNT: usize = 10;

/// Territories at indices below this start under player control.
const PLAYER_BAND: usize = 4;

/// Index of the territory held by the target enemy at game start.
const TARGET_SLOT: usize = 4;

/// Smallest map the allocation rule is defined for.
pub const MIN_TERRITORIES: usize = TARGET_SLOT + 1;

/// 1-based territory identifier, as the player types it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TerritoryId(usize);

impl TerritoryId {
    /// Wrap a 1-based id.
    #[must_use]
    pub const fn new(id: usize) -> Self {
        Self(id)
    }

    /// Id of the territory stored at a 0-based index.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self(index + 1)
    }

    /// The raw 1-based value.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for TerritoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One ownable region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Territory {
    name: String,
    /// Faction currently in control.
    pub owner: Faction,
    /// Troops stationed here. Only an attacker that just captured can sit at 0.
    pub troops: u32,
}

impl Territory {
    /// Create a territory.
    #[must_use]
    pub fn new(name: impl Into<String>, owner: Faction, troops: u32) -> Self {
        Self {
            name: name.into(),
            owner,
            troops,
        }
    }

    /// Display name, fixed at creation.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// The ordered collection of territories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Map {
    territories: Vec<Territory>,
}

impl Map {
    /// Build a map with the starting allocation.
    ///
    /// - indices `0..4`: player, 3 or 4 troops
    /// - index `4`: target enemy, 4 to 6 troops
    /// - the rest: a random generic enemy, 2 or 3 troops
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::TooFewTerritories`] if `count` leaves no room for
    /// the target-enemy slot.
    pub fn generate<R: RandomSource + ?Sized>(
        count: usize,
        rng: &mut R,
    ) -> Result<Self, SetupError> {
        if count < MIN_TERRITORIES {
            return Err(SetupError::TooFewTerritories {
                requested: count,
                minimum: MIN_TERRITORIES,
            });
        }

        let territories = (0..count)
            .map(|index| {
                let name = format!("Territory {}", index + 1);
                if index < PLAYER_BAND {
                    Territory::new(name, Faction::PLAYER, 3 + rng.below(2))
                } else if index == TARGET_SLOT {
                    Territory::new(name, Faction::TARGET, 4 + rng.below(3))
                } else {
                    // Faction is drawn before troops.
                    let owner = Faction::OTHER_ENEMIES[rng.below(2) as usize];
                    Territory::new(name, owner, 2 + rng.below(2))
                }
            })
            .collect();

        Ok(Self { territories })
    }

    /// Build a map from explicit territories.
    #[must_use]
    pub fn from_territories(territories: Vec<Territory>) -> Self {
        Self { territories }
    }

    /// Number of territories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.territories.len()
    }

    /// Whether the map has no territories.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.territories.is_empty()
    }

    /// Translate raw player input into a 0-based index.
    ///
    /// Returns `None` unless `1 <= selection <= len`.
    #[must_use]
    pub fn index_of(&self, selection: i64) -> Option<usize> {
        let id = usize::try_from(selection).ok()?;
        (1..=self.len()).contains(&id).then(|| id - 1)
    }

    /// Territory by 1-based id.
    #[must_use]
    pub fn get(&self, id: TerritoryId) -> Option<&Territory> {
        id.get().checked_sub(1).and_then(|idx| self.territories.get(idx))
    }

    /// Territory by 0-based index.
    #[must_use]
    pub fn at(&self, index: usize) -> Option<&Territory> {
        self.territories.get(index)
    }

    /// Mutable territory by 0-based index.
    #[must_use]
    pub fn at_mut(&mut self, index: usize) -> Option<&mut Territory> {
        self.territories.get_mut(index)
    }

    /// Borrow two distinct territories mutably.
    ///
    /// Returns `None` if the indices are equal or either is out of bounds.
    #[must_use]
    pub fn pair_mut(&mut self, a: usize, b: usize) -> Option<(&mut Territory, &mut Territory)> {
        if a == b || a >= self.len() || b >= self.len() {
            return None;
        }
        if a < b {
            let (head, tail) = self.territories.split_at_mut(b);
            Some((&mut head[a], &mut tail[0]))
        } else {
            let (head, tail) = self.territories.split_at_mut(a);
            Some((&mut tail[0], &mut head[b]))
        }
    }

    /// Territories in order.
    #[must_use]
    pub fn territories(&self) -> &[Territory] {
        &self.territories
    }

    /// Iterate over ids and territories.
    pub fn iter(&self) -> impl Iterator<Item = (TerritoryId, &Territory)> {
        self.territories
            .iter()
            .enumerate()
            .map(|(idx, territory)| (TerritoryId::from_index(idx), territory))
    }

    /// Iterate over territories owned by a faction.
    pub fn owned_by(&self, faction: Faction) -> impl Iterator<Item = (TerritoryId, &Territory)> {
        self.iter().filter(move |(_, t)| t.owner == faction)
    }

    /// Count territories owned by a faction.
    #[must_use]
    pub fn count_owned_by(&self, faction: Faction) -> usize {
        self.owned_by(faction).count()
    }

    /// Whether a faction still holds at least one territory.
    #[must_use]
    pub fn is_present(&self, faction: Faction) -> bool {
        self.territories.iter().any(|t| t.owner == faction)
    }

    /// Sum of troops across the whole map.
    #[must_use]
    pub fn total_troops(&self) -> u64 {
        self.territories.iter().map(|t| u64::from(t.troops)).sum()
    }
}

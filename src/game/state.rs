//! Game state management.

use serde::Serialize;

use crate::dice::RandomSource;
use crate::error::{AttackError, SetupError};
use crate::game::{
    resolve_attack, validate_attacker, validate_defender, CombatReport, Faction, Map, Mission,
    MissionProgress, TERRITORY_COUNT,
};

/// Lifecycle of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Map and mission are being drawn.
    Setup,
    /// Accepting player actions.
    Playing,
    /// The player checked the mission and it was complete.
    Won,
    /// The player asked to leave.
    QuitRequested,
    /// No further actions are processed.
    Terminated,
}

/// Turn controller policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControllerConfig {
    /// Re-prompt a territory selection after a validation failure instead of
    /// abandoning the attack.
    pub retry_invalid_selection: bool,
}

/// Settings for a new game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameConfig {
    /// Force a mission instead of drawing one.
    pub mission: Option<Mission>,
    /// Turn controller policy.
    pub controller: ControllerConfig,
}

/// Result of checking the mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MissionCheck {
    /// Map scan the decision was made from.
    pub progress: MissionProgress,
    /// Whether the mission is complete.
    pub complete: bool,
}

/// Complete game state.
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    map: Map,
    mission: Mission,
    player: Faction,
    phase: Phase,
    turn: u32,
}

impl GameState {
    /// Set up a new game: build the map, then draw the mission.
    ///
    /// # Errors
    ///
    /// Returns a [`SetupError`] if the map cannot be built.
    pub fn new<R: RandomSource + ?Sized>(
        config: GameConfig,
        rng: &mut R,
    ) -> Result<Self, SetupError> {
        let map = Map::generate(TERRITORY_COUNT, rng)?;
        let mission = match config.mission {
            Some(mission) => mission,
            None => Mission::assign(rng),
        };
        let mut state = Self {
            map,
            mission,
            player: Faction::PLAYER,
            phase: Phase::Setup,
            turn: 0,
        };
        tracing::debug!(?mission, troops = state.map.total_troops(), "setup complete");
        state.phase = Phase::Playing;
        Ok(state)
    }

    /// Start a game from an explicit map and mission.
    #[must_use]
    pub fn from_parts(map: Map, mission: Mission) -> Self {
        Self {
            map,
            mission,
            player: Faction::PLAYER,
            phase: Phase::Playing,
            turn: 0,
        }
    }

    /// The map.
    #[must_use]
    pub const fn map(&self) -> &Map {
        &self.map
    }

    /// The player's secret mission.
    #[must_use]
    pub const fn mission(&self) -> Mission {
        self.mission
    }

    /// The faction the player controls.
    #[must_use]
    pub const fn player(&self) -> Faction {
        self.player
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of completed turns.
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// Whether actions are still accepted.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }

    /// Validate an attacker selection against the current map.
    ///
    /// # Errors
    ///
    /// See [`validate_attacker`].
    pub fn validate_attacker(&self, selection: i64) -> Result<usize, AttackError> {
        validate_attacker(&self.map, selection, self.player)
    }

    /// Validate a defender selection against the current map.
    ///
    /// # Errors
    ///
    /// See [`validate_defender`].
    pub fn validate_defender(&self, attacker: usize, selection: i64) -> Result<usize, AttackError> {
        validate_defender(&self.map, attacker, selection, self.player)
    }

    /// Validate both selections and resolve one combat round.
    ///
    /// Nothing is mutated when an error is returned.
    ///
    /// # Errors
    ///
    /// Returns the first violated condition, or [`AttackError::GameOver`]
    /// outside the playing phase.
    pub fn attack<R: RandomSource + ?Sized>(
        &mut self,
        attacker: i64,
        defender: i64,
        rng: &mut R,
    ) -> Result<CombatReport, AttackError> {
        if !self.is_playing() {
            return Err(AttackError::GameOver);
        }
        let from = self.validate_attacker(attacker)?;
        let to = self.validate_defender(from, defender)?;
        let player = self.player;
        let (attacking, defending) = self
            .map
            .pair_mut(from, to)
            .ok_or(AttackError::GameOver)?;
        Ok(resolve_attack(attacking, defending, player, rng))
    }

    /// Evaluate the mission; a complete mission wins the game.
    pub fn check_mission(&mut self) -> MissionCheck {
        let progress = MissionProgress::scan(&self.map, self.player);
        let complete = self.is_playing() && progress.satisfies(self.mission);
        if complete {
            self.phase = Phase::Won;
            tracing::info!(mission = ?self.mission, turn = self.turn, "mission complete");
        }
        MissionCheck { progress, complete }
    }

    /// Ask to leave the game.
    pub fn request_quit(&mut self) {
        if self.is_playing() {
            self.phase = Phase::QuitRequested;
        }
    }

    /// Count a finished turn.
    pub fn end_turn(&mut self) {
        self.turn = self.turn.saturating_add(1);
    }

    /// Stop processing actions.
    pub fn terminate(&mut self) {
        self.phase = Phase::Terminated;
    }

    /// Consume the state, yielding its map.
    #[must_use]
    pub fn into_map(self) -> Map {
        self.map
    }
}

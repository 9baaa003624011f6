//! Headless games played by a scripted greedy player.
//!
//! Provides a pure function interface: `(seed, config) -> SimResult`.
//!
//! The scripted player answers the same prompts a human would, so every
//! simulated game runs through the real [`TurnController`]. Batches run in
//! parallel with rayon; each game owns its own state and RNG.

use rayon::prelude::*;
use serde::Serialize;

use crate::dice::GameRng;
use crate::error::SetupError;
use crate::game::{
    Console, Ending, Faction, GameConfig, GameEvent, GameState, Map, Mission, MissionProgress,
    Prompt, TerritoryId, TurnController, ACTION_PROMPT, ATTACKER_PROMPT, DEFENDER_PROMPT,
    MIN_ATTACKING_TROOPS, MISSIONS, MISSION_COUNT,
};

/// Configuration for simulated games.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Turns after which the scripted player gives up.
    pub max_turns: u32,
    /// Force a mission instead of drawing one.
    pub mission: Option<Mission>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_turns: 200,
            mission: None,
        }
    }
}

/// Why a simulated game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SimEnding {
    /// The mission was completed.
    Won,
    /// No owned territory had enough troops to attack.
    Stalled,
    /// The turn cap was reached.
    TurnLimit,
}

/// Result of a single simulated game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SimResult {
    /// Seed the game was played with.
    pub seed: u64,
    /// The player's mission.
    pub mission: Mission,
    /// How the game ended.
    pub ending: SimEnding,
    /// Turns played.
    pub turns: u32,
    /// Combat rounds fought.
    pub attacks: u32,
    /// Territories captured.
    pub captures: u32,
    /// Territories held by the player at the end.
    pub player_territories: usize,
}

/// Pick the next attack for the greedy player.
///
/// Attacks from the strongest owned territory into the weakest enemy one,
/// preferring target-enemy territories when the mission is to destroy them.
/// Ties go to the lowest id. Returns `None` when no territory can attack.
#[must_use]
pub fn plan_attack(map: &Map, mission: Mission, player: Faction) -> Option<(TerritoryId, TerritoryId)> {
    let (from, _) = map
        .owned_by(player)
        .filter(|(_, t)| t.troops >= MIN_ATTACKING_TROOPS)
        .min_by_key(|(id, t)| (std::cmp::Reverse(t.troops), *id))?;

    let hunting_target =
        mission == Mission::DestroyTargetFaction && map.is_present(Faction::TARGET);
    let (to, _) = map
        .iter()
        .filter(|(_, t)| t.owner != player)
        .filter(|(_, t)| !hunting_target || t.owner == Faction::TARGET)
        .min_by_key(|(id, t)| (t.troops, *id))?;

    Some((from, to))
}

/// Console that plays for the greedy player.
struct GreedyConsole {
    max_turns: u32,
    mission: Option<Mission>,
    player: Faction,
    map: Option<Map>,
    plan: Option<(TerritoryId, TerritoryId)>,
    prompts: u32,
    stop: Option<SimEnding>,
    attacks: u32,
    captures: u32,
}

impl GreedyConsole {
    fn new(max_turns: u32) -> Self {
        Self {
            max_turns,
            mission: None,
            player: Faction::PLAYER,
            map: None,
            plan: None,
            prompts: 0,
            stop: None,
            attacks: 0,
            captures: 0,
        }
    }

    fn choose_action(&mut self) -> Prompt {
        self.prompts += 1;
        let (Some(map), Some(mission)) = (self.map.as_ref(), self.mission) else {
            return Prompt::Closed;
        };

        if MissionProgress::scan(map, self.player).satisfies(mission) {
            return Prompt::Number(2);
        }
        if self.prompts > self.max_turns {
            self.stop = Some(SimEnding::TurnLimit);
            return Prompt::Number(0);
        }
        self.plan = plan_attack(map, mission, self.player);
        if self.plan.is_some() {
            Prompt::Number(1)
        } else {
            self.stop = Some(SimEnding::Stalled);
            Prompt::Number(0)
        }
    }
}

fn id_prompt(id: Option<TerritoryId>) -> Prompt {
    id.and_then(|id| i64::try_from(id.get()).ok())
        .map_or(Prompt::Invalid, Prompt::Number)
}

impl Console for GreedyConsole {
    fn show_map(&mut self, map: &Map) {
        self.map = Some(map.clone());
    }

    fn show_menu(&mut self) {}

    fn show_mission(&mut self, mission: Mission) {
        self.mission = Some(mission);
    }

    fn prompt_integer(&mut self, label: &str) -> Prompt {
        match label {
            ACTION_PROMPT => self.choose_action(),
            ATTACKER_PROMPT => id_prompt(self.plan.map(|(from, _)| from)),
            DEFENDER_PROMPT => id_prompt(self.plan.map(|(_, to)| to)),
            _ => Prompt::Invalid,
        }
    }

    fn pause(&mut self) {}

    fn notify(&mut self, event: &GameEvent<'_>) {
        match event {
            GameEvent::Started { player } => self.player = *player,
            GameEvent::Battle { report, .. } => {
                self.attacks += 1;
                if report.captured {
                    self.captures += 1;
                }
            }
            _ => {}
        }
    }
}

/// Play one game with the greedy player.
///
/// # Errors
///
/// Returns an error if the game cannot be set up.
pub fn run_game(seed: u64, config: SimulationConfig) -> Result<SimResult, SetupError> {
    let mut rng = GameRng::seeded(seed);
    let game_config = GameConfig {
        mission: config.mission,
        ..GameConfig::default()
    };
    let state = GameState::new(game_config, &mut rng)?;
    let player = state.player();
    let controller = TurnController::new(state, game_config.controller);

    let mut console = GreedyConsole::new(config.max_turns);
    let outcome = controller.run(&mut console, &mut rng);

    let ending = match outcome.ending {
        Ending::Won => SimEnding::Won,
        Ending::Quit => console.stop.unwrap_or(SimEnding::Stalled),
    };
    tracing::debug!(seed, ?ending, turns = outcome.turns, "simulated game finished");

    Ok(SimResult {
        seed,
        mission: outcome.mission,
        ending,
        turns: outcome.turns,
        attacks: console.attacks,
        captures: console.captures,
        player_territories: outcome.map.count_owned_by(player),
    })
}

/// Play `games` games with consecutive seeds starting at `first_seed`.
///
/// Games run in parallel; results come back in seed order.
///
/// # Errors
///
/// Returns the first setup error encountered.
pub fn run_batch(
    first_seed: u64,
    games: u64,
    config: SimulationConfig,
) -> Result<Vec<SimResult>, SetupError> {
    (0..games)
        .into_par_iter()
        .map(|i| run_game(first_seed.wrapping_add(i), config))
        .collect()
}

/// Per-mission aggregate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MissionStats {
    /// Games played with this mission.
    pub games: u64,
    /// Games won.
    pub wins: u64,
    /// Sum of turns over won games.
    pub turns_to_win: u64,
}

impl MissionStats {
    /// Fraction of games won.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn win_rate(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.wins as f64 / self.games as f64
        }
    }

    /// Mean turns taken by won games.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_turns_to_win(&self) -> Option<f64> {
        (self.wins > 0).then(|| self.turns_to_win as f64 / self.wins as f64)
    }
}

/// Statistics aggregated over many simulated games.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchStats {
    /// Total games played.
    pub games_played: u64,
    /// Games won.
    pub wins: u64,
    /// Games that ran out of attackers.
    pub stalled: u64,
    /// Games that hit the turn cap.
    pub turn_limit: u64,
    /// Total captures across all games.
    pub captures: u64,
    /// Per-mission breakdown, in mission id order.
    pub missions: [MissionStats; MISSION_COUNT],
}

impl BatchStats {
    /// Add a game result to the stats.
    pub fn add_result(&mut self, result: &SimResult) {
        self.games_played += 1;
        self.captures += u64::from(result.captures);

        let slot = usize::from(result.mission.id()).saturating_sub(1);
        let mission = &mut self.missions[slot.min(MISSION_COUNT - 1)];
        mission.games += 1;

        match result.ending {
            SimEnding::Won => {
                self.wins += 1;
                mission.wins += 1;
                mission.turns_to_win += u64::from(result.turns);
            }
            SimEnding::Stalled => self.stalled += 1,
            SimEnding::TurnLimit => self.turn_limit += 1,
        }
    }

    /// Merge another set of stats into this one.
    pub fn merge(&mut self, other: &Self) {
        self.games_played += other.games_played;
        self.wins += other.wins;
        self.stalled += other.stalled;
        self.turn_limit += other.turn_limit;
        self.captures += other.captures;
        for (mine, theirs) in self.missions.iter_mut().zip(&other.missions) {
            mine.games += theirs.games;
            mine.wins += theirs.wins;
            mine.turns_to_win += theirs.turns_to_win;
        }
    }

    /// Stats for one mission.
    #[must_use]
    pub fn mission(&self, mission: Mission) -> MissionStats {
        MISSIONS
            .iter()
            .position(|m| *m == mission)
            .map_or_else(MissionStats::default, |idx| self.missions[idx])
    }

    /// Fraction of all games won.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn win_rate(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            self.wins as f64 / self.games_played as f64
        }
    }
}

//! Turn controller.
//!
//! Drives a [`GameState`] through a [`Console`]: each turn it shows the map
//! and the menu, reads one action, and applies it. The controller never
//! checks the mission on its own. The game is only won when the player asks
//! for a mission check and the mission is complete.

use serde::Serialize;

use crate::dice::RandomSource;
use crate::error::AttackError;
use crate::game::{
    check_invariants, CombatReport, ControllerConfig, Faction, GameState, Map, Mission,
    MissionProgress, Phase, Territory,
};

/// Label used when asking for the menu choice.
pub const ACTION_PROMPT: &str = "Choose your action (0-2)";

/// Label used when asking for the attacking territory.
pub const ATTACKER_PROMPT: &str = "Attacking territory ID (yours)";

/// Label used when asking for the defending territory.
pub const DEFENDER_PROMPT: &str = "Defending territory ID (enemy)";

/// Result of asking the player for a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    /// The player entered an integer.
    Number(i64),
    /// The input was not an integer.
    Invalid,
    /// The input stream ended.
    Closed,
}

/// Menu actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Launch an attack.
    Attack,
    /// Check whether the mission is complete.
    CheckMission,
    /// Leave the game.
    Quit,
}

impl Action {
    /// Map a menu number to an action.
    #[must_use]
    pub const fn from_choice(choice: i64) -> Option<Self> {
        match choice {
            1 => Some(Action::Attack),
            2 => Some(Action::CheckMission),
            0 => Some(Action::Quit),
            _ => None,
        }
    }
}

/// Something the player should be told about.
#[derive(Debug, Clone, Copy)]
pub enum GameEvent<'a> {
    /// The game has started.
    Started {
        /// The player's faction.
        player: Faction,
    },
    /// The attack phase began.
    AttackPhase {
        /// Highest valid territory id.
        territories: usize,
    },
    /// Both selections passed and the dice are about to be rolled.
    BattleStarted {
        /// Attacking territory before the round.
        attacker: &'a Territory,
        /// Defending territory before the round.
        defender: &'a Territory,
    },
    /// A combat round finished.
    Battle {
        /// Name of the defending territory.
        defender: &'a str,
        /// Round details.
        report: CombatReport,
    },
    /// A selection was rejected.
    AttackRejected(AttackError),
    /// The mission was checked and is not complete yet.
    MissionIncomplete(MissionProgress),
    /// The mission was checked and is complete.
    Victory {
        /// The completed mission.
        mission: Mission,
        /// Map scan at the time of victory.
        progress: MissionProgress,
    },
    /// The menu choice was not a known action.
    InvalidChoice,
    /// The player is leaving.
    Quitting,
}

/// External collaborator that renders the game and reads player input.
pub trait Console {
    /// Display the map.
    fn show_map(&mut self, map: &Map);

    /// Display the action menu.
    fn show_menu(&mut self);

    /// Display the mission briefing.
    fn show_mission(&mut self, mission: Mission);

    /// Ask the player for an integer.
    fn prompt_integer(&mut self, label: &str) -> Prompt;

    /// Wait until the player acknowledges.
    fn pause(&mut self);

    /// Report an event.
    fn notify(&mut self, event: &GameEvent<'_>);
}

/// How a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Ending {
    /// The mission was completed.
    Won,
    /// The player quit or input ran out.
    Quit,
}

/// Summary of a finished game.
#[derive(Debug, Clone, Serialize)]
pub struct GameOutcome {
    /// How the game ended.
    pub ending: Ending,
    /// The player's mission.
    pub mission: Mission,
    /// Number of turns played.
    pub turns: u32,
    /// Map at the end of the game.
    pub map: Map,
}

/// A territory choice made at a prompt.
enum Selection {
    Chosen { index: usize, selection: i64 },
    Aborted,
    Closed,
}

/// Sequences player turns.
#[derive(Debug)]
pub struct TurnController {
    state: GameState,
    config: ControllerConfig,
}

impl TurnController {
    /// Wrap a game state that has finished setup.
    #[must_use]
    pub const fn new(state: GameState, config: ControllerConfig) -> Self {
        Self { state, config }
    }

    /// Current game state.
    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// Play until the player wins or quits.
    pub fn run<C, R>(mut self, console: &mut C, rng: &mut R) -> GameOutcome
    where
        C: Console + ?Sized,
        R: RandomSource + ?Sized,
    {
        console.notify(&GameEvent::Started {
            player: self.state.player(),
        });
        console.show_mission(self.state.mission());

        while self.state.is_playing() {
            self.play_turn(console, rng);
        }

        let ending = if self.state.phase() == Phase::Won {
            Ending::Won
        } else {
            Ending::Quit
        };
        self.state.terminate();
        tracing::info!(?ending, turns = self.state.turn(), "game over");

        GameOutcome {
            ending,
            mission: self.state.mission(),
            turns: self.state.turn(),
            map: self.state.into_map(),
        }
    }

    /// Play a single turn and return the resulting phase.
    pub fn play_turn<C, R>(&mut self, console: &mut C, rng: &mut R) -> Phase
    where
        C: Console + ?Sized,
        R: RandomSource + ?Sized,
    {
        console.show_map(self.state.map());
        console.show_menu();

        match console.prompt_integer(ACTION_PROMPT) {
            Prompt::Number(choice) => match Action::from_choice(choice) {
                Some(Action::Attack) => self.attack_phase(console, rng),
                Some(Action::CheckMission) => self.check_mission(console),
                Some(Action::Quit) => self.quit(console),
                None => console.notify(&GameEvent::InvalidChoice),
            },
            Prompt::Invalid => console.notify(&GameEvent::InvalidChoice),
            Prompt::Closed => self.quit(console),
        }

        self.state.end_turn();
        if self.state.is_playing() {
            console.pause();
        }
        self.state.phase()
    }

    fn attack_phase<C, R>(&mut self, console: &mut C, rng: &mut R)
    where
        C: Console + ?Sized,
        R: RandomSource + ?Sized,
    {
        console.notify(&GameEvent::AttackPhase {
            territories: self.state.map().len(),
        });

        let (from, attacker) =
            match self.select(console, ATTACKER_PROMPT, |state, n| state.validate_attacker(n)) {
                Selection::Chosen { index, selection } => (index, selection),
                Selection::Aborted => return,
                Selection::Closed => return self.quit(console),
            };
        let (to, defender) = match self.select(console, DEFENDER_PROMPT, |state, n| {
            state.validate_defender(from, n)
        }) {
            Selection::Chosen { index, selection } => (index, selection),
            Selection::Aborted => return,
            Selection::Closed => return self.quit(console),
        };

        if let (Some(att), Some(def)) = (self.state.map().at(from), self.state.map().at(to)) {
            console.notify(&GameEvent::BattleStarted {
                attacker: att,
                defender: def,
            });
        }

        match self.state.attack(attacker, defender, rng) {
            Ok(report) => {
                let name = self.state.map().at(to).map_or("", Territory::name);
                console.notify(&GameEvent::Battle {
                    defender: name,
                    report,
                });
            }
            Err(err) => console.notify(&GameEvent::AttackRejected(err)),
        }

        if cfg!(debug_assertions) {
            for violation in check_invariants(&self.state) {
                tracing::warn!(%violation, "invariant violated");
            }
        }
    }

    fn select<C, F>(&self, console: &mut C, label: &str, validate: F) -> Selection
    where
        C: Console + ?Sized,
        F: Fn(&GameState, i64) -> Result<usize, AttackError>,
    {
        loop {
            match console.prompt_integer(label) {
                Prompt::Number(selection) => match validate(&self.state, selection) {
                    Ok(index) => return Selection::Chosen { index, selection },
                    Err(err) => {
                        tracing::debug!(%err, selection, "selection rejected");
                        console.notify(&GameEvent::AttackRejected(err));
                        if !self.config.retry_invalid_selection {
                            return Selection::Aborted;
                        }
                    }
                },
                Prompt::Invalid => return Selection::Aborted,
                Prompt::Closed => return Selection::Closed,
            }
        }
    }

    fn check_mission<C: Console + ?Sized>(&mut self, console: &mut C) {
        let check = self.state.check_mission();
        if check.complete {
            console.notify(&GameEvent::Victory {
                mission: self.state.mission(),
                progress: check.progress,
            });
        } else {
            console.notify(&GameEvent::MissionIncomplete(check.progress));
        }
    }

    fn quit<C: Console + ?Sized>(&mut self, console: &mut C) {
        console.notify(&GameEvent::Quitting);
        self.state.request_quit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::SequenceSource;
    use std::collections::VecDeque;

    /// Console that replays canned input and records what it was told.
    #[derive(Default)]
    struct ScriptedConsole {
        input: VecDeque<Prompt>,
        rejections: Vec<AttackError>,
        battles: usize,
        pauses: usize,
        maps_shown: usize,
        incomplete_checks: usize,
        victories: usize,
        invalid_choices: usize,
    }

    impl ScriptedConsole {
        fn new(input: &[Prompt]) -> Self {
            Self {
                input: input.iter().copied().collect(),
                ..Self::default()
            }
        }
    }

    impl Console for ScriptedConsole {
        fn show_map(&mut self, _map: &Map) {
            self.maps_shown += 1;
        }

        fn show_menu(&mut self) {}

        fn show_mission(&mut self, _mission: Mission) {}

        fn prompt_integer(&mut self, _label: &str) -> Prompt {
            self.input.pop_front().unwrap_or(Prompt::Closed)
        }

        fn pause(&mut self) {
            self.pauses += 1;
        }

        fn notify(&mut self, event: &GameEvent<'_>) {
            match event {
                GameEvent::AttackRejected(err) => self.rejections.push(*err),
                GameEvent::Battle { .. } => self.battles += 1,
                GameEvent::MissionIncomplete(_) => self.incomplete_checks += 1,
                GameEvent::Victory { .. } => self.victories += 1,
                GameEvent::InvalidChoice => self.invalid_choices += 1,
                _ => {}
            }
        }
    }

    fn create_controller(retry: bool) -> TurnController {
        let territories = (0..10)
            .map(|i| {
                let (owner, troops) = match i {
                    0 => (Faction::Blue, 4),
                    1..=3 => (Faction::Blue, 1),
                    4 => (Faction::Black, 1),
                    _ => (Faction::Yellow, 2),
                };
                Territory::new(format!("Territory {}", i + 1), owner, troops)
            })
            .collect();
        let state = GameState::from_parts(
            Map::from_territories(territories),
            Mission::DestroyTargetFaction,
        );
        TurnController::new(
            state,
            ControllerConfig {
                retry_invalid_selection: retry,
            },
        )
    }

    use super::Prompt::Number;

    #[test]
    fn test_action_from_choice() {
        assert_eq!(Action::from_choice(1), Some(Action::Attack));
        assert_eq!(Action::from_choice(2), Some(Action::CheckMission));
        assert_eq!(Action::from_choice(0), Some(Action::Quit));
        assert_eq!(Action::from_choice(3), None);
        assert_eq!(Action::from_choice(-1), None);
    }

    #[test]
    fn test_capture_then_check_wins() {
        let controller = create_controller(false);
        let mut console = ScriptedConsole::new(&[Number(1), Number(1), Number(5), Number(2)]);
        let mut dice = SequenceSource::dice(&[6, 1]);

        let outcome = controller.run(&mut console, &mut dice);
        assert_eq!(outcome.ending, Ending::Won);
        assert_eq!(outcome.turns, 2);
        assert_eq!(console.battles, 1);
        assert_eq!(console.victories, 1);
        // Pause after the attack, none after the winning check.
        assert_eq!(console.pauses, 1);
    }

    #[test]
    fn test_capture_alone_does_not_win() {
        let controller = create_controller(false);
        let mut console = ScriptedConsole::new(&[Number(1), Number(1), Number(5), Number(0)]);
        let mut dice = SequenceSource::dice(&[6, 1]);

        let outcome = controller.run(&mut console, &mut dice);
        assert_eq!(outcome.ending, Ending::Quit);
        assert_eq!(console.victories, 0);
        assert_eq!(outcome.map.territories()[4].owner, Faction::Blue);
    }

    #[test]
    fn test_invalid_attacker_aborts_attack() {
        let controller = create_controller(false);
        // Territory 2 has a single troop; the defender prompt is never reached.
        let mut console = ScriptedConsole::new(&[Number(1), Number(2), Number(0)]);
        let mut dice = SequenceSource::dice(&[6, 1]);

        let outcome = controller.run(&mut console, &mut dice);
        assert_eq!(outcome.ending, Ending::Quit);
        assert_eq!(console.battles, 0);
        assert_eq!(console.rejections.len(), 1);
        assert_eq!(dice.draws(), 0);
    }

    #[test]
    fn test_retry_policy_reprompts() {
        let controller = create_controller(true);
        let mut console = ScriptedConsole::new(&[
            Number(1),
            Number(6),
            Number(1),
            Number(1),
            Number(5),
            Number(0),
        ]);
        let mut dice = SequenceSource::dice(&[6, 1]);

        let outcome = controller.run(&mut console, &mut dice);
        assert_eq!(console.rejections.len(), 2);
        assert_eq!(console.battles, 1);
        assert_eq!(outcome.map.territories()[4].owner, Faction::Blue);
    }

    #[test]
    fn test_non_numeric_input_aborts_quietly() {
        let controller = create_controller(false);
        let mut console = ScriptedConsole::new(&[Number(1), Prompt::Invalid, Number(0)]);
        let mut dice = SequenceSource::dice(&[6, 1]);

        let outcome = controller.run(&mut console, &mut dice);
        assert_eq!(outcome.turns, 2);
        assert!(console.rejections.is_empty());
        assert_eq!(console.battles, 0);
    }

    #[test]
    fn test_invalid_menu_choice_spends_turn() {
        let controller = create_controller(false);
        let mut console = ScriptedConsole::new(&[Number(7), Prompt::Invalid, Number(0)]);
        let mut dice = SequenceSource::dice(&[6, 1]);

        let outcome = controller.run(&mut console, &mut dice);
        assert_eq!(console.invalid_choices, 2);
        assert_eq!(console.pauses, 2);
        assert_eq!(outcome.turns, 3);
    }

    #[test]
    fn test_incomplete_check_keeps_playing() {
        let controller = create_controller(false);
        let mut console = ScriptedConsole::new(&[Number(2), Number(2), Number(0)]);
        let mut dice = SequenceSource::dice(&[1]);

        let outcome = controller.run(&mut console, &mut dice);
        assert_eq!(outcome.ending, Ending::Quit);
        assert_eq!(console.incomplete_checks, 2);
        assert_eq!(console.maps_shown, 3);
    }

    #[test]
    fn test_closed_input_quits() {
        let controller = create_controller(false);
        let mut console = ScriptedConsole::new(&[Number(1), Number(1)]);
        let mut dice = SequenceSource::dice(&[6, 1]);

        let outcome = controller.run(&mut console, &mut dice);
        assert_eq!(outcome.ending, Ending::Quit);
        assert_eq!(outcome.turns, 1);
        assert_eq!(console.pauses, 0);
    }
}

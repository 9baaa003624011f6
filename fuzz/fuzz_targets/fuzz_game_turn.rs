#![no_main]

//! Full game turn fuzzer.
//!
//! Feeds arbitrary prompt answers to the turn controller:
//! 1. Menu choices, including out-of-range and non-numeric ones
//! 2. Territory selections, valid or not
//! 3. Early end of input
//!
//! Invariants are checked after every turn. This catches integration bugs
//! that the combat fuzzer misses.

use std::collections::VecDeque;

use arbitrary::Arbitrary;
use conquest::dice::GameRng;
use conquest::game::{
    check_invariants, ControllerConfig, GameConfig, GameEvent, GameState, Map, Mission, Phase,
    Prompt, TurnController,
};
use conquest::Console;
use libfuzzer_sys::fuzz_target;

/// A fuzzer-generated answer to a prompt.
#[derive(Arbitrary, Debug, Clone, Copy)]
enum FuzzAnswer {
    /// An integer, usually near the valid id range.
    Number(i8),
    /// Any integer at all.
    Wide(i64),
    /// Something that is not a number.
    Garbage,
}

/// Structured input for full game fuzzing.
#[derive(Arbitrary, Debug)]
struct GameTurnInput {
    /// Game seed.
    seed: u64,
    /// Re-prompt invalid selections.
    retry: bool,
    /// Answers, consumed in order.
    answers: Vec<FuzzAnswer>,
}

struct FuzzConsole {
    answers: VecDeque<FuzzAnswer>,
}

impl Console for FuzzConsole {
    fn show_map(&mut self, _map: &Map) {}

    fn show_menu(&mut self) {}

    fn show_mission(&mut self, _mission: Mission) {}

    fn prompt_integer(&mut self, _label: &str) -> Prompt {
        match self.answers.pop_front() {
            Some(FuzzAnswer::Number(n)) => Prompt::Number(i64::from(n)),
            Some(FuzzAnswer::Wide(n)) => Prompt::Number(n),
            Some(FuzzAnswer::Garbage) => Prompt::Invalid,
            None => Prompt::Closed,
        }
    }

    fn pause(&mut self) {}

    fn notify(&mut self, _event: &GameEvent<'_>) {}
}

fuzz_target!(|input: GameTurnInput| {
    // Cap answers to keep runs short
    let answers: VecDeque<_> = input.answers.into_iter().take(200).collect();

    let config = GameConfig {
        mission: None,
        controller: ControllerConfig {
            retry_invalid_selection: input.retry,
        },
    };
    let mut rng = GameRng::seeded(input.seed);
    let Ok(state) = GameState::new(config, &mut rng) else {
        return;
    };
    let start_troops = state.map().total_troops();

    let violations = check_invariants(&state);
    assert!(violations.is_empty(), "Invariants violated at start: {violations:?}");

    let mut controller = TurnController::new(state, config.controller);
    let mut console = FuzzConsole { answers };

    let mut turns = 0;
    while controller.state().is_playing() {
        let phase = controller.play_turn(&mut console, &mut rng);
        turns += 1;

        let violations = check_invariants(controller.state());
        assert!(
            violations.is_empty(),
            "Invariants violated after turn {turns}: {violations:?}"
        );
        if phase == Phase::Won {
            assert!(controller
                .state()
                .mission()
                .evaluate(controller.state().map(), controller.state().player()));
        }
        // Every answer is consumed by at most one turn, and input running
        // out ends the game.
        assert!(turns <= 201);
    }

    // Troops are never created
    assert!(controller.state().map().total_troops() <= start_troops);
});

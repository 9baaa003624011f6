//! Play command: an interactive game on the terminal.

use std::io::{self, BufRead, Write};

use conquest::game::{
    ControllerConfig, Ending, Faction, GameConfig, GameEvent, Map, Mission, Prompt, RoundWinner,
};
use conquest::{Console, GameRng, GameState, TurnController};
use crossterm::style::{Color, Stylize};

use super::{parse_mission, seed_or_random, CliError};

/// Execute the play command.
///
/// # Errors
///
/// Returns an error if setup fails or the terminal cannot be written.
pub(crate) fn execute(
    seed: Option<u64>,
    mission: Option<u8>,
    retry_invalid: bool,
    no_color: bool,
) -> Result<(), CliError> {
    let seed = seed_or_random(seed);
    let config = GameConfig {
        mission: parse_mission(mission)?,
        controller: ControllerConfig {
            retry_invalid_selection: retry_invalid,
        },
    };

    let mut rng = GameRng::seeded(seed);
    let state = GameState::new(config, &mut rng)?;
    tracing::info!(seed, "starting interactive game");

    let stdin = io::stdin();
    let mut console = TerminalConsole::new(stdin.lock(), io::stdout().lock(), !no_color);
    let outcome = TurnController::new(state, config.controller).run(&mut console, &mut rng);
    console.finish()?;

    if outcome.ending == Ending::Won {
        tracing::info!(seed, turns = outcome.turns, "player won");
    }
    Ok(())
}

/// Terminal renderer and line-based input reader.
///
/// The controller cannot handle I/O failures, so the first write error is
/// kept and reported by [`TerminalConsole::finish`]. A failed read counts as
/// closed input, which ends the game.
pub(crate) struct TerminalConsole<R, W> {
    input: R,
    output: W,
    color: bool,
    error: Option<io::Error>,
}

impl<R: BufRead, W: Write> TerminalConsole<R, W> {
    pub(crate) fn new(input: R, output: W, color: bool) -> Self {
        Self {
            input,
            output,
            color,
            error: None,
        }
    }

    /// Flush and surface any I/O error seen during the game.
    pub(crate) fn finish(mut self) -> io::Result<()> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.output.flush()
    }

    fn write(&mut self, text: &str) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.output.write_all(text.as_bytes()) {
            self.error = Some(e);
        }
    }

    fn flush(&mut self) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.output.flush() {
            self.error = Some(e);
        }
    }

    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read input");
                None
            }
        }
    }

    fn faction(&self, faction: Faction, width: usize) -> String {
        let label = format!("{:<width$}", faction.label());
        if self.color {
            label.with(faction_color(faction)).to_string()
        } else {
            label
        }
    }

    fn highlight(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }
}

const fn faction_color(faction: Faction) -> Color {
    match faction {
        Faction::Blue => Color::Blue,
        Faction::Black => Color::DarkGrey,
        Faction::Yellow => Color::Yellow,
        Faction::Green => Color::Green,
    }
}

impl<R: BufRead, W: Write> Console for TerminalConsole<R, W> {
    fn show_map(&mut self, map: &Map) {
        let mut text = String::from("\n================ WORLD MAP ================\n");
        text.push_str("| ID | Name              | Owner    | Troops |\n");
        text.push_str("|----|-------------------|----------|--------|\n");
        for (id, territory) in map.iter() {
            let owner = self.faction(territory.owner, 8);
            text.push_str(&format!(
                "| {:<2} | {:<17} | {owner} | {:<6} |\n",
                id.get(),
                territory.name(),
                territory.troops
            ));
        }
        text.push_str("===========================================\n");
        self.write(&text);
    }

    fn show_menu(&mut self) {
        self.write(
            "\n--- ACTIONS ---\n1. Attack\n2. Check mission\n0. Quit\n---------------\n",
        );
    }

    fn show_mission(&mut self, mission: Mission) {
        let text = format!("\n--- SECRET MISSION ---\n{mission}\n----------------------\n");
        self.write(&text);
    }

    fn prompt_integer(&mut self, label: &str) -> Prompt {
        self.write(&format!("{label}: "));
        self.flush();
        let Some(line) = self.read_line() else {
            return Prompt::Closed;
        };
        line.split_whitespace()
            .next()
            .and_then(|token| token.parse::<i64>().ok())
            .map_or(Prompt::Invalid, Prompt::Number)
    }

    fn pause(&mut self) {
        self.write("\nPress ENTER to continue...");
        self.flush();
        let _ = self.read_line();
    }

    fn notify(&mut self, event: &GameEvent<'_>) {
        let text = match event {
            GameEvent::Started { player } => format!(
                "\n===========================================\n        CONQUEST - GAME START\n===========================================\nYour army color is: {}\n",
                self.faction(*player, 0)
            ),
            GameEvent::AttackPhase { territories } => format!(
                "\n*** ATTACK PHASE ***\nSelect territories by ID (1 to {territories}).\n"
            ),
            GameEvent::BattleStarted { attacker, defender } => format!(
                "\n--- BATTLE: {} ({} troops) vs {} ({} troops) ---\n",
                attacker.name(),
                attacker.troops,
                defender.name(),
                defender.troops
            ),
            GameEvent::Battle { defender, report } => {
                let mut text = format!(
                    "Dice rolled: Attacker ({}) vs Defender ({})\n",
                    report.attacker_roll, report.defender_roll
                );
                text.push_str(match report.winner {
                    RoundWinner::Attacker => "Attacker won the round. Defender lost 1 troop.\n",
                    RoundWinner::Defender => "Defender won the round. Attacker lost 1 troop.\n",
                });
                if report.captured {
                    let banner = format!("*** CONQUEST! {defender} HAS BEEN CAPTURED! ***");
                    text.push_str(&format!("\n{}\n", self.highlight(&banner)));
                }
                text
            }
            GameEvent::AttackRejected(err) => format!("{err}\n"),
            GameEvent::MissionIncomplete(progress) => format!(
                "\n--- Mission not complete yet. Keep fighting. ---\nStatus: {} territories held.\n",
                progress.player_territories
            ),
            GameEvent::Victory { .. } => format!(
                "\n{}\n",
                self.highlight("*** CONGRATULATIONS! MISSION COMPLETE! YOU WIN! ***")
            ),
            GameEvent::InvalidChoice => "\nInvalid option. Try again.\n".to_string(),
            GameEvent::Quitting => "\nEnding the game...\n".to_string(),
        };
        self.write(&text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conquest::game::Territory;
    use conquest::SetupError;
    use std::io::Cursor;

    fn create_state() -> GameState {
        let territories = (0..10)
            .map(|i| {
                let (owner, troops) = match i {
                    0 => (Faction::Blue, 4),
                    1..=3 => (Faction::Blue, 3),
                    4 => (Faction::Black, 1),
                    _ => (Faction::Green, 2),
                };
                Territory::new(format!("Territory {}", i + 1), owner, troops)
            })
            .collect();
        GameState::from_parts(Map::from_territories(territories), Mission::DestroyTargetFaction)
    }

    fn play(input: &str, state: GameState) -> (String, Ending) {
        let mut output = Vec::new();
        let mut console = TerminalConsole::new(Cursor::new(input.as_bytes()), &mut output, false);
        let mut dice = conquest::dice::SequenceSource::dice(&[6, 1]);
        let outcome = TurnController::new(state, ControllerConfig::default())
            .run(&mut console, &mut dice);
        console.finish().unwrap();
        (String::from_utf8(output).unwrap(), outcome.ending)
    }

    #[test]
    fn test_capture_and_win_transcript() {
        let (text, ending) = play("1\n1\n5\n\n2\n", create_state());
        assert_eq!(ending, Ending::Won);
        assert!(text.contains("Your army color is: BLUE"));
        assert!(text.contains("BATTLE: Territory 1 (4 troops) vs Territory 5 (1 troops)"));
        assert!(text.contains("Dice rolled: Attacker (6) vs Defender (1)"));
        assert!(text.contains("Territory 5 HAS BEEN CAPTURED"));
        assert!(text.contains("YOU WIN"));
    }

    #[test]
    fn test_garbage_input_is_invalid_choice() {
        let (text, ending) = play("abc\n\n0\n", create_state());
        assert_eq!(ending, Ending::Quit);
        assert!(text.contains("Invalid option"));
        assert!(text.contains("Ending the game"));
    }

    #[test]
    fn test_end_of_input_quits() {
        let (text, ending) = play("", create_state());
        assert_eq!(ending, Ending::Quit);
        assert!(text.contains("Ending the game"));
    }

    #[test]
    fn test_map_rendering_without_color() {
        let mut output = Vec::new();
        let mut console = TerminalConsole::new(Cursor::new(&b""[..]), &mut output, false);
        console.show_map(create_state().map());
        console.finish().unwrap();
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("| 5  | Territory 5       | BLACK    | 1      |"));
        assert!(!text.contains('\u{1b}'));
    }

    #[test]
    fn test_setup_error_converts() {
        let err = CliError::from(SetupError::TooFewTerritories {
            requested: 2,
            minimum: 5,
        });
        assert!(err.to_string().starts_with("Game setup failed"));
    }
}

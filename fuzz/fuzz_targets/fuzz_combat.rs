#![no_main]

//! Combat round fuzzer.
//!
//! Throws arbitrary territory pairs and dice at the combat resolver and checks
//! the troop accounting and capture rules.

use arbitrary::Arbitrary;
use conquest::dice::SequenceSource;
use conquest::game::{resolve_attack, Faction, RoundWinner, Territory, OCCUPYING_TROOPS};
use libfuzzer_sys::fuzz_target;

/// Structured input for combat fuzzing.
#[derive(Arbitrary, Debug)]
struct CombatInput {
    /// Attacker troops.
    attacker_troops: u8,
    /// Defender troops.
    defender_troops: u8,
    /// Defender faction selector.
    defender_owner: u8,
    /// Raw dice values.
    rolls: [u32; 2],
}

const ENEMIES: [Faction; 3] = [Faction::Black, Faction::Yellow, Faction::Green];

fuzz_target!(|input: CombatInput| {
    // The resolver is only called after validation: at least 2 attackers and
    // a garrisoned enemy.
    let attacker_troops = u32::from(input.attacker_troops).max(2);
    let defender_troops = u32::from(input.defender_troops).max(1);
    let owner = ENEMIES[usize::from(input.defender_owner) % ENEMIES.len()];

    let mut attacker = Territory::new("A", Faction::PLAYER, attacker_troops);
    let mut defender = Territory::new("D", owner, defender_troops);
    let mut dice = SequenceSource::new(input.rolls.to_vec());

    let report = resolve_attack(&mut attacker, &mut defender, Faction::PLAYER, &mut dice);

    assert!((1..=6).contains(&report.attacker_roll));
    assert!((1..=6).contains(&report.defender_roll));
    assert_eq!(
        report.winner == RoundWinner::Attacker,
        report.attacker_roll > report.defender_roll
    );

    let before = attacker_troops + defender_troops;
    let after = attacker.troops + defender.troops;
    assert_eq!(before - after, 1, "{report:?}");

    if report.captured {
        assert_eq!(defender.owner, Faction::PLAYER);
        assert_eq!(defender.troops, OCCUPYING_TROOPS);
        assert_eq!(defender_troops, 1);
    } else {
        assert_eq!(defender.owner, owner);
        assert!(defender.troops > 0);
    }
    assert_eq!(report.attacker_troops, attacker.troops);
    assert_eq!(report.defender_troops, defender.troops);
});

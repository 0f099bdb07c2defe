//! End-to-end rounds through `Session`, one per rule interaction.

use std::collections::BTreeSet;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::domain::night::resolve_night;
use crate::domain::roles::{ActionKind, Role};
use crate::domain::state::{NightAction, NightActions, Phase};
use crate::domain::test_state_helpers::{night_session, roster_with_roles};
use crate::domain::victory::Verdict;

#[test]
fn quiet_first_night_kills_nobody() {
    let mut session = night_session(&[Role::Don, Role::Civilian, Role::Civilian, Role::Civilian], 11);
    let outcome = session.resolve_round().unwrap();
    assert!(outcome.deaths.is_empty());
    assert_eq!(outcome.verdict, Verdict::Undecided);
    assert_eq!(session.phase(), Phase::Day);
}

#[test]
fn unopposed_faction_kill_lands() {
    let mut session = night_session(&[Role::Don, Role::Civilian, Role::Civilian, Role::Civilian, Role::Civilian], 11);
    session
        .submit_night_action(1, Role::Don, ActionKind::FactionKill, 3)
        .unwrap();
    let outcome = session.resolve_round().unwrap();
    assert_eq!(outcome.deaths, vec![3]);
    assert!(!session.roster().is_alive(3));
}

#[test]
fn heal_saves_the_faction_target() {
    let mut session = night_session(&[Role::Don, Role::Doctor, Role::Civilian, Role::Civilian], 11);
    session
        .submit_night_action(1, Role::Don, ActionKind::FactionKill, 3)
        .unwrap();
    session
        .submit_night_action(2, Role::Doctor, ActionKind::Heal, 3)
        .unwrap();
    let outcome = session.resolve_round().unwrap();
    assert!(outcome.deaths.is_empty());
}

#[test]
fn suicide_takes_its_target_along() {
    let mut session = night_session(
        &[Role::Don, Role::Suicide, Role::Civilian, Role::Civilian, Role::Civilian, Role::Civilian],
        11,
    );
    session
        .submit_night_action(2, Role::Suicide, ActionKind::SuicideKill, 4)
        .unwrap();
    let outcome = session.resolve_round().unwrap();
    assert_eq!(outcome.deaths, vec![2, 4]);
}

#[test]
fn yakuza_vengeance_fires_once_per_game() {
    let roles = [
        Role::Don,
        Role::Mafia,
        Role::Mafia,
        Role::Yakuza,
        Role::Maniac,
        Role::Civilian,
        Role::Civilian,
        Role::Civilian,
    ];
    let mut session = night_session(&roles, 5);
    session
        .submit_night_action(5, Role::Maniac, ActionKind::ManiacKill, 4)
        .unwrap();
    let outcome = session.resolve_round().unwrap();

    let vengeance = outcome.vengeance.expect("vengeance triggered");
    assert_eq!(vengeance.avenger, 4);
    let victim = vengeance.victim.expect("a mafia member was alive");
    assert!([1, 2, 3].contains(&victim));
    assert_eq!(outcome.deaths.len(), 2);
    assert!(outcome.deaths.contains(&4));
    assert!(outcome.deaths.contains(&victim));
    assert!(session.flags().vengeance_used);

    // A second якудза death with the flag spent takes nobody along.
    let roster = roster_with_roles(&roles);
    let actions: NightActions = [(ActionKind::ManiacKill, NightAction { actor: 5, target: 4 })]
        .into_iter()
        .collect();
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let second = resolve_night(&roster, &actions, &session.flags(), &mut rng);
    assert_eq!(second.deaths, BTreeSet::from([4]));
    assert!(second.vengeance.is_none());
}

#[test]
fn same_seed_same_vengeance_victim() {
    let roles = [
        Role::Don,
        Role::Mafia,
        Role::Mafia,
        Role::Yakuza,
        Role::Maniac,
        Role::Civilian,
        Role::Civilian,
        Role::Civilian,
    ];
    let run = || {
        let mut session = night_session(&roles, 77);
        session
            .submit_night_action(5, Role::Maniac, ActionKind::ManiacKill, 4)
            .unwrap();
        session.resolve_round().unwrap().deaths
    };
    assert_eq!(run(), run());
}

#[test]
fn mutual_wipe_ends_with_no_winner() {
    let mut session = night_session(&[Role::Don, Role::Maniac], 3);
    session
        .submit_night_action(1, Role::Don, ActionKind::FactionKill, 2)
        .unwrap();
    session
        .submit_night_action(2, Role::Maniac, ActionKind::ManiacKill, 1)
        .unwrap();
    let outcome = session.resolve_round().unwrap();
    assert_eq!(outcome.verdict, Verdict::NoOne);
    assert_eq!(session.phase(), Phase::Ended);
}

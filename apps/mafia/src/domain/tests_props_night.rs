//! Property tests for night resolution.

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::domain::night::resolve_night;
use crate::domain::roles::{ActionKind, Role};
use crate::domain::state::{NightAction, NightActions, OneShotFlags, PlayerId};
use crate::domain::test_prelude;
use crate::domain::test_state_helpers::roster_with_roles;

/// Killers and counters in fixed seats, then civilians from seat 7.
fn table(civilians: usize) -> Vec<Role> {
    let mut roles = vec![
        Role::Don,
        Role::Maniac,
        Role::Doctor,
        Role::Mistress,
        Role::Werewolf,
        Role::Sniper,
    ];
    roles.extend(std::iter::repeat_n(Role::Civilian, civilians));
    roles
}

const FIRST_CIVILIAN: PlayerId = 7;

/// Every kill source with its seat in `table`.
const KILLERS: [(ActionKind, PlayerId); 4] = [
    (ActionKind::FactionKill, 1),
    (ActionKind::ManiacKill, 2),
    (ActionKind::WerewolfKill, 5),
    (ActionKind::SniperShot, 6),
];

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Whoever the doctor heals survives, whatever else targeted them.
    #[test]
    fn prop_heal_overrides_every_kill(
        civilians in 1usize..=6,
        target_offset in 0usize..=5,
        sources in prop::collection::vec(any::<bool>(), 4),
        seed in any::<u64>(),
    ) {
        let roster = roster_with_roles(&table(civilians));
        let target = FIRST_CIVILIAN + (target_offset % civilians) as PlayerId;
        let mut actions: NightActions = KILLERS
            .into_iter()
            .zip(&sources)
            .filter(|(_, on)| **on)
            .map(|((kind, actor), _)| (kind, NightAction { actor, target }))
            .collect();
        actions.submit(ActionKind::Heal, NightAction { actor: 3, target });
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let out = resolve_night(&roster, &actions, &OneShotFlags::default(), &mut rng);
        prop_assert!(!out.deaths.contains(&target));
    }

    /// A blocked killer kills nobody; every other killer is unaffected.
    #[test]
    fn prop_block_nullifies_only_the_blocked_actor(
        civilians in 4usize..=6,
        blocked_index in 0usize..4,
        seed in any::<u64>(),
    ) {
        let roster = roster_with_roles(&table(civilians));
        let blocked = KILLERS[blocked_index].1;
        let mut actions: NightActions = KILLERS
            .into_iter()
            .enumerate()
            .map(|(i, (kind, actor))| {
                (kind, NightAction { actor, target: FIRST_CIVILIAN + i as PlayerId })
            })
            .collect();
        actions.submit(ActionKind::Block, NightAction { actor: 4, target: blocked });
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let out = resolve_night(&roster, &actions, &OneShotFlags::default(), &mut rng);
        for i in 0..KILLERS.len() {
            let victim = FIRST_CIVILIAN + i as PlayerId;
            prop_assert_eq!(out.deaths.contains(&victim), i != blocked_index);
        }
    }

    /// Deaths only ever name living roster members.
    #[test]
    fn prop_deaths_are_living_players(
        civilians in 1usize..=6,
        kill_target in 1i64..=10,
        maniac_target in 1i64..=10,
        seed in any::<u64>(),
    ) {
        let roster = roster_with_roles(&table(civilians));
        let n = roster.len() as PlayerId;
        let actions: NightActions = [
            (ActionKind::FactionKill, NightAction { actor: 1, target: 1 + (kill_target - 1) % n }),
            (ActionKind::ManiacKill, NightAction { actor: 2, target: 1 + (maniac_target - 1) % n }),
        ]
        .into_iter()
        .collect();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let out = resolve_night(&roster, &actions, &OneShotFlags::default(), &mut rng);
        for id in &out.deaths {
            prop_assert!(roster.is_alive(*id));
        }
    }
}

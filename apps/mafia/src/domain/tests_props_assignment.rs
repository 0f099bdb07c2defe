//! Property tests for role dealing.

use std::collections::BTreeMap;

use proptest::prelude::*;

use crate::domain::assignment::assign_roles;
use crate::domain::roles::{Role, UNIQUE_ROLES};
use crate::domain::rules::mafia_count;
use crate::domain::state::PlayerId;
use crate::domain::test_gens;
use crate::domain::test_prelude;

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Every seat gets a role, exactly one дон, the right mafia share, and
    /// no unique role twice.
    #[test]
    fn prop_assignment_invariants(n in test_gens::player_count(), seed in any::<u64>()) {
        let players: Vec<PlayerId> = (1..=n as PlayerId).collect();
        let dealt = assign_roles(&players, seed).unwrap();
        prop_assert_eq!(dealt.len(), n);

        let mut counts: BTreeMap<Role, usize> = BTreeMap::new();
        for (_, role) in &dealt {
            *counts.entry(*role).or_default() += 1;
        }
        prop_assert_eq!(counts.get(&Role::Don).copied(), Some(1));
        let mafia = counts.get(&Role::Mafia).copied().unwrap_or(0) + 1;
        prop_assert_eq!(mafia, mafia_count(n));
        for role in UNIQUE_ROLES {
            prop_assert!(counts.get(&role).copied().unwrap_or(0) <= 1);
        }

        let seats: Vec<PlayerId> = dealt.iter().map(|(id, _)| *id).collect();
        prop_assert_eq!(seats, players);
    }

    /// Same players and seed, same deal.
    #[test]
    fn prop_assignment_is_reproducible(n in test_gens::player_count(), seed in any::<u64>()) {
        let players: Vec<PlayerId> = (1..=n as PlayerId).collect();
        prop_assert_eq!(assign_roles(&players, seed).unwrap(), assign_roles(&players, seed).unwrap());
    }
}

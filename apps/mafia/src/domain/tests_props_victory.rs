//! Property tests for win evaluation.

use proptest::prelude::*;

use crate::domain::roles::Faction;
use crate::domain::test_gens;
use crate::domain::test_prelude;
use crate::domain::test_state_helpers::{kill, roster_with_roles};
use crate::domain::victory::{evaluate, FactionCounts, Verdict};

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Evaluating twice gives the same answer.
    #[test]
    fn prop_evaluate_is_idempotent(roles in prop::collection::vec(test_gens::role(), 0..=12)) {
        let roster = roster_with_roles(&roles);
        prop_assert_eq!(evaluate(&roster), evaluate(&roster));
    }

    /// A winner is declared only when every living player is on its side.
    #[test]
    fn prop_winner_owns_every_living_seat(
        roles in prop::collection::vec(test_gens::role(), 1..=12),
        dead in prop::collection::vec(any::<bool>(), 12),
    ) {
        let mut roster = roster_with_roles(&roles);
        for (i, is_dead) in dead.iter().take(roles.len()).enumerate() {
            if *is_dead {
                kill(&mut roster, i as i64 + 1);
            }
        }
        let counts = FactionCounts::of(&roster);
        match evaluate(&roster) {
            Verdict::NoOne => prop_assert_eq!(counts.total(), 0),
            Verdict::Winner(faction) => {
                let own = match faction {
                    Faction::Mafia => counts.mafia,
                    Faction::Maniac => counts.maniac,
                    Faction::Werewolf => counts.werewolf,
                    Faction::Peaceful => counts.peaceful,
                };
                prop_assert!(own > 0);
                prop_assert_eq!(own, counts.total());
            }
            Verdict::Undecided => {
                let sides = [counts.mafia, counts.maniac, counts.werewolf, counts.peaceful]
                    .iter()
                    .filter(|n| **n > 0)
                    .count();
                prop_assert!(sides > 1);
            }
        }
    }

    /// A living don beside a living civilian never ends the game.
    #[test]
    fn prop_mixed_table_is_undecided(roles in test_gens::undecided_roles()) {
        let roster = roster_with_roles(&roles);
        prop_assert_eq!(evaluate(&roster), Verdict::Undecided);
    }
}

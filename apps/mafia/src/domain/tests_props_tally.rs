//! Property tests for the day tally.

use proptest::prelude::*;

use crate::domain::day::tally_votes;
use crate::domain::test_gens;
use crate::domain::test_prelude;

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// The executed player strictly out-polls everyone else; otherwise the
    /// top count is shared or there were no votes.
    #[test]
    fn prop_execution_requires_strict_plurality(votes in test_gens::day_votes(8)) {
        let tally = tally_votes(&votes);
        let total: usize = tally.counts.values().sum();
        prop_assert_eq!(total, votes.len());

        match tally.executed {
            Some(id) => {
                let top = tally.counts[&id];
                for (other, n) in &tally.counts {
                    if *other != id {
                        prop_assert!(*n < top);
                    }
                }
            }
            None => {
                let top = tally.counts.values().copied().max().unwrap_or(0);
                let leaders = tally.counts.values().filter(|n| **n == top).count();
                prop_assert!(votes.is_empty() || leaders > 1);
            }
        }
    }
}

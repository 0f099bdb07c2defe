//! Day vote tally.

use std::collections::BTreeMap;

use crate::domain::state::{DayVotes, PlayerId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    /// Votes received per target.
    pub counts: BTreeMap<PlayerId, usize>,
    /// The unique top target, if there is one.
    pub executed: Option<PlayerId>,
}

/// Count votes and pick the executed player.
///
/// No votes, or a tie at the top, executes nobody. Ties are never broken.
pub fn tally_votes(votes: &DayVotes) -> Tally {
    let mut counts: BTreeMap<PlayerId, usize> = BTreeMap::new();
    for target in votes.values() {
        *counts.entry(*target).or_default() += 1;
    }

    let top = counts.values().copied().max().unwrap_or(0);
    let mut leaders = counts.iter().filter(|(_, n)| **n == top).map(|(id, _)| *id);
    let executed = match (leaders.next(), leaders.next()) {
        (Some(id), None) if top > 0 => Some(id),
        _ => None,
    };

    Tally { counts, executed }
}

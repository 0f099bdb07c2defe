// Proptest generators for domain types.

use proptest::prelude::*;

use crate::domain::roles::{Role, ALL_ROLES};
use crate::domain::state::{DayVotes, PlayerId};

pub fn role() -> impl Strategy<Value = Role> {
    prop::sample::select(ALL_ROLES.to_vec())
}

/// Player count in the legal range.
pub fn player_count() -> impl Strategy<Value = usize> {
    4usize..=20
}

/// Roles for a roster of 4..=12 seats, with at least one living mafia seat
/// and one peaceful seat so the game is undecided.
pub fn undecided_roles() -> impl Strategy<Value = Vec<Role>> {
    prop::collection::vec(role(), 2..=10).prop_map(|mut roles| {
        roles.push(Role::Don);
        roles.push(Role::Civilian);
        roles
    })
}

/// Votes among players 1..=n.
pub fn day_votes(n: PlayerId) -> impl Strategy<Value = DayVotes> {
    prop::collection::btree_map(1..=n, 1..=n, 0..=n as usize)
}

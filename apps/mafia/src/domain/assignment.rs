//! Deterministic role dealing.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::domain::roles::{Role, UNIQUE_ROLES};
use crate::domain::rules::{mafia_count, MIN_PLAYERS};
use crate::domain::state::PlayerId;
use crate::errors::domain::{DomainError, ValidationKind};

/// Build the shuffled role slate for `players` seats.
///
/// The slate holds one дон plus `mafia_count - 1` мафия, then unique roles
/// drawn without replacement, then мирный filler. The whole slate is
/// shuffled so seat order says nothing about draw order.
pub fn build_slate(players: usize, rng: &mut ChaCha8Rng) -> Vec<Role> {
    let mafia = mafia_count(players).min(players);
    let mut slate = Vec::with_capacity(players);
    slate.push(Role::Don);
    slate.extend(std::iter::repeat_n(Role::Mafia, mafia.saturating_sub(1)));

    let mut unique = UNIQUE_ROLES;
    unique.shuffle(rng);
    let open = players - slate.len();
    slate.extend(unique.iter().copied().take(open));

    slate.resize(players, Role::Civilian);
    slate.shuffle(rng);
    slate
}

/// Deal one role per player, deterministically for a given seed.
///
/// Returns `(player, role)` pairs in the order of `players`.
///
/// # Errors
///
/// `InsufficientPlayers` when fewer than four players are given.
pub fn assign_roles(players: &[PlayerId], seed: u64) -> Result<Vec<(PlayerId, Role)>, DomainError> {
    if players.len() < MIN_PLAYERS {
        return Err(DomainError::validation(
            ValidationKind::InsufficientPlayers,
            format!(
                "at least {MIN_PLAYERS} players are required, got {}",
                players.len()
            ),
        ));
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let slate = build_slate(players.len(), &mut rng);
    Ok(players.iter().copied().zip(slate).collect())
}

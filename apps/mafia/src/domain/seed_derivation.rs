//! RNG seed derivation utilities for deterministic sessions.
//!
//! Every session carries one base seed. Each randomized step (role
//! assignment, night resolution) derives its own seed from it so that a
//! replay with the same base seed makes the same choices.

/// Derive the seed used to shuffle and deal roles.
pub fn derive_assignment_seed(session_seed: u64) -> u64 {
    session_seed
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
        .wrapping_add(1) // Offset to distinguish from night seeds
}

/// Derive the seed for resolving the night that opened as window `round_no`.
///
/// # Arguments
///
/// * `session_seed` - Base seed of the session
/// * `round_no` - 1-based collection window number
pub fn derive_night_seed(session_seed: u64, round_no: u32) -> u64 {
    session_seed
        .wrapping_add((round_no as u64).wrapping_mul(1_000_000))
        .wrapping_add(2)
}

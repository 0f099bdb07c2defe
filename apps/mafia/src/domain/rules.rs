pub const MIN_PLAYERS: usize = 4;
pub const MAX_PLAYERS: usize = 20;
pub const DEFAULT_ROUND_WINDOW_SECS: u64 = 60;

/// Mafia-aligned seats for a roster of `players`: a third, at least one.
pub fn mafia_count(players: usize) -> usize {
    (players / 3).max(1)
}

//! Unique ids so tests sharing a process never collide on a chat.

use std::sync::atomic::{AtomicI64, Ordering};

static NEXT_ID: AtomicI64 = AtomicI64::new(-1_000_000);

/// A chat id no other caller in this process has seen.
pub fn unique_chat_id() -> i64 {
    NEXT_ID.fetch_sub(1, Ordering::Relaxed)
}

/// `n` distinct player ids, ascending.
pub fn unique_player_ids(n: usize) -> Vec<i64> {
    let mut ids: Vec<i64> = (0..n).map(|_| NEXT_ID.fetch_sub(1, Ordering::Relaxed)).collect();
    ids.sort_unstable();
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_do_not_repeat() {
        let a = unique_chat_id();
        let b = unique_chat_id();
        assert_ne!(a, b);
        let players = unique_player_ids(5);
        assert_eq!(players.len(), 5);
        assert!(players.windows(2).all(|w| w[0] < w[1]));
        assert!(!players.contains(&a));
    }
}

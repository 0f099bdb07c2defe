//! Test support for the engine's integration tests.

pub mod test_logging;
pub mod unique;

pub use unique::{unique_chat_id, unique_player_ids};

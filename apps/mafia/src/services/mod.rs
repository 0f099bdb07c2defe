//! Session lifecycle on top of the pure domain: registry, windows, delivery.

pub mod game_service;
pub mod registry;
pub mod round_driver;

pub use game_service::{GameService, LeaveOutcome, RoundReport};
pub use registry::{LiveSession, SessionRegistry};

//! Collaborators the engine calls into but does not implement.

pub mod economy;
pub mod messenger;
pub mod notices;

pub use economy::{Economy, EconomyError, InMemoryEconomy};
pub use messenger::{Delivery, DeliveryError, Messenger, NullMessenger, RecordingMessenger};
pub use notices::{DeathNotice, PrivateNotice, PublicNotice};

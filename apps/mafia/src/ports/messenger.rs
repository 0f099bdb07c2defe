//! Outbound delivery port.

use std::collections::BTreeSet;

use async_trait::async_trait;
use parking_lot::Mutex;
use thiserror::Error;

use crate::domain::state::{ChatId, PlayerId};
use crate::ports::notices::{PrivateNotice, PublicNotice};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// The player never opened a private chat with the bot, or blocked it.
    #[error("player {0} is unreachable")]
    Unreachable(PlayerId),
    #[error("transport failure: {0}")]
    Transport(String),
}

#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send_private(&self, player: PlayerId, notice: PrivateNotice)
        -> Result<(), DeliveryError>;

    async fn broadcast(&self, chat: ChatId, notice: PublicNotice) -> Result<(), DeliveryError>;
}

/// Drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullMessenger;

#[async_trait]
impl Messenger for NullMessenger {
    async fn send_private(&self, _: PlayerId, _: PrivateNotice) -> Result<(), DeliveryError> {
        Ok(())
    }

    async fn broadcast(&self, _: ChatId, _: PublicNotice) -> Result<(), DeliveryError> {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Private { player: PlayerId, notice: PrivateNotice },
    Public { chat: ChatId, notice: PublicNotice },
}

/// Keeps every delivered notice in order. Players marked unreachable get
/// `DeliveryError::Unreachable` and nothing is recorded for them.
#[derive(Debug, Default)]
pub struct RecordingMessenger {
    deliveries: Mutex<Vec<Delivery>>,
    unreachable: Mutex<BTreeSet<PlayerId>>,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_unreachable(&self, player: PlayerId) {
        self.unreachable.lock().insert(player);
    }

    pub fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries.lock().clone()
    }

    pub fn private_for(&self, player: PlayerId) -> Vec<PrivateNotice> {
        self.deliveries
            .lock()
            .iter()
            .filter_map(|d| match d {
                Delivery::Private { player: p, notice } if *p == player => Some(notice.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn public_for(&self, chat: ChatId) -> Vec<PublicNotice> {
        self.deliveries
            .lock()
            .iter()
            .filter_map(|d| match d {
                Delivery::Public { chat: c, notice } if *c == chat => Some(notice.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.deliveries.lock().clear();
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send_private(
        &self,
        player: PlayerId,
        notice: PrivateNotice,
    ) -> Result<(), DeliveryError> {
        if self.unreachable.lock().contains(&player) {
            return Err(DeliveryError::Unreachable(player));
        }
        self.deliveries
            .lock()
            .push(Delivery::Private { player, notice });
        Ok(())
    }

    async fn broadcast(&self, chat: ChatId, notice: PublicNotice) -> Result<(), DeliveryError> {
        self.deliveries.lock().push(Delivery::Public { chat, notice });
        Ok(())
    }
}

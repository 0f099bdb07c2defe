//! Balance and purchase store.

use std::collections::BTreeSet;

use async_trait::async_trait;
use dashmap::DashMap;
use thiserror::Error;

use crate::domain::state::PlayerId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EconomyError {
    #[error("economy store unavailable: {0}")]
    Unavailable(String),
}

/// Per-player balances and purchases. Implementations must make a single
/// player's read-modify-write atomic.
#[async_trait]
pub trait Economy: Send + Sync {
    async fn balance(&self, player: PlayerId) -> Result<u64, EconomyError>;

    /// Deduct `amount`. `Ok(false)` means insufficient funds, with the
    /// balance untouched.
    async fn spend(&self, player: PlayerId, amount: u64) -> Result<bool, EconomyError>;

    /// Whether the player's role is hidden when they die.
    async fn has_anonymity(&self, player: PlayerId) -> Result<bool, EconomyError>;
}

pub const STARTING_BALANCE: u64 = 1000;

#[derive(Debug, Clone, Default)]
struct Account {
    balance: u64,
    anonymous: bool,
}

/// Process-local economy. Each account sits behind its own map shard lock.
#[derive(Debug, Default)]
pub struct InMemoryEconomy {
    accounts: DashMap<PlayerId, Account>,
}

impl InMemoryEconomy {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_account<R>(&self, player: PlayerId, f: impl FnOnce(&mut Account) -> R) -> R {
        let mut entry = self.accounts.entry(player).or_insert_with(|| Account {
            balance: STARTING_BALANCE,
            anonymous: false,
        });
        f(entry.value_mut())
    }

    /// Spend `price` and mark the player anonymous. Returns whether the
    /// purchase went through.
    pub fn buy_anonymity(&self, player: PlayerId, price: u64) -> bool {
        self.with_account(player, |account| {
            if account.anonymous {
                return true;
            }
            if account.balance < price {
                return false;
            }
            account.balance -= price;
            account.anonymous = true;
            true
        })
    }

    pub fn anonymous_players(&self) -> BTreeSet<PlayerId> {
        self.accounts
            .iter()
            .filter(|entry| entry.value().anonymous)
            .map(|entry| *entry.key())
            .collect()
    }
}

#[async_trait]
impl Economy for InMemoryEconomy {
    async fn balance(&self, player: PlayerId) -> Result<u64, EconomyError> {
        Ok(self.with_account(player, |account| account.balance))
    }

    async fn spend(&self, player: PlayerId, amount: u64) -> Result<bool, EconomyError> {
        Ok(self.with_account(player, |account| {
            if account.balance < amount {
                return false;
            }
            account.balance -= amount;
            true
        }))
    }

    async fn has_anonymity(&self, player: PlayerId) -> Result<bool, EconomyError> {
        Ok(self
            .accounts
            .get(&player)
            .is_some_and(|account| account.anonymous))
    }
}

//! Structured messages the engine hands to the transport.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::night::Finding;
use crate::domain::roles::{ActionKind, Role};
use crate::domain::session::PlayerSnapshot;
use crate::domain::state::{ChatId, Phase, PlayerId};
use crate::domain::victory::Verdict;

/// A death as announced to the chat. `role` is `None` for anonymous players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathNotice {
    pub player: PlayerId,
    pub name: String,
    pub role: Option<Role>,
}

impl fmt::Display for DeathNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.role {
            Some(role) => write!(f, "{} ({})", self.name, role),
            None => write!(f, "{} (роль скрыта)", self.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PrivateNotice {
    RoleReveal {
        chat_id: ChatId,
        role: Role,
    },
    /// Sent to each living night role when a night opens.
    ActionPrompt {
        chat_id: ChatId,
        round_no: u32,
        role: Role,
        actions: Vec<ActionKind>,
        targets: Vec<PlayerId>,
    },
    InvestigationResult {
        chat_id: ChatId,
        target: PlayerId,
        finding: Finding,
    },
    MafiaChat {
        chat_id: ChatId,
        from: PlayerId,
        from_name: String,
        text: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PublicNotice {
    /// A collection window opened. During the day `candidates` doubles as
    /// the vote prompt.
    PhaseChange {
        phase: Phase,
        round_no: u32,
        window_secs: u64,
        candidates: Vec<PlayerId>,
    },
    RoundSummary {
        round_no: u32,
        resolved: Phase,
        deaths: Vec<DeathNotice>,
        executed: Option<PlayerId>,
        immortal_spared: bool,
    },
    GameOver {
        verdict: Verdict,
        players: Vec<PlayerSnapshot>,
    },
    Stopped {
        by: PlayerId,
    },
}

use std::sync::Arc;
use std::time::Duration;

use mafia::domain::{ChatId, PlayerId, Role, SessionSnapshot};
use mafia::ports::{InMemoryEconomy, PublicNotice, RecordingMessenger};
use mafia::{EngineConfig, GameService};
use mafia_test_support::{unique_chat_id, unique_player_ids};

/// A service wired to recording doubles, with one chat reserved.
pub struct Harness {
    pub service: GameService,
    pub messenger: Arc<RecordingMessenger>,
    pub economy: Arc<InMemoryEconomy>,
    pub chat: ChatId,
}

impl Harness {
    pub fn new(config: EngineConfig) -> Self {
        let messenger = Arc::new(RecordingMessenger::new());
        let economy = Arc::new(InMemoryEconomy::new());
        let service = GameService::new(config, messenger.clone(), economy.clone());
        Self {
            service,
            messenger,
            economy,
            chat: unique_chat_id(),
        }
    }

    /// Rounds advance only when a test resolves them.
    pub fn manual() -> Self {
        Self::new(EngineConfig {
            auto_advance: false,
            ..EngineConfig::default()
        })
    }

    pub fn timed(window: Duration) -> Self {
        Self::new(EngineConfig {
            round_window: window,
            auto_advance: true,
            ..EngineConfig::default()
        })
    }

    /// Create the session and join `n` players. The first is the creator.
    pub fn seat(&self, n: usize, seed: u64) -> Vec<PlayerId> {
        let players = unique_player_ids(n);
        self.service
            .create_session_with_seed(self.chat, players[0], seed)
            .expect("create session");
        for (i, id) in players.iter().enumerate() {
            self.service
                .join(self.chat, *id, format!("player-{i}"))
                .expect("join");
        }
        players
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.service.snapshot(self.chat).expect("session is live")
    }

    pub fn role_of(&self, player: PlayerId) -> Role {
        self.snapshot()
            .players
            .into_iter()
            .find(|p| p.id == player)
            .and_then(|p| p.role)
            .expect("player has a role")
    }

    pub fn holder(&self, role: Role) -> Option<PlayerId> {
        self.snapshot()
            .players
            .into_iter()
            .find(|p| p.alive && p.role == Some(role))
            .map(|p| p.id)
    }

    pub fn living(&self) -> Vec<PlayerId> {
        self.snapshot()
            .players
            .into_iter()
            .filter(|p| p.alive)
            .map(|p| p.id)
            .collect()
    }

    pub fn public(&self) -> Vec<PublicNotice> {
        self.messenger.public_for(self.chat)
    }
}

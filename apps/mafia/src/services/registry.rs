//! Process-wide map of live sessions keyed by chat.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::{Mutex, MutexGuard};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::domain::session::{Session, SessionSnapshot};
use crate::domain::state::ChatId;
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};

/// Session plus the collection window guarding it.
#[derive(Debug)]
pub struct LiveState {
    pub session: Session,
    /// Close of the open window. `None` means submissions stay open until
    /// someone resolves the round.
    pub deadline: Option<Instant>,
}

impl LiveState {
    /// Reject submissions once the window is past its deadline.
    pub fn ensure_window_open(&self, now: Instant) -> Result<(), DomainError> {
        match self.deadline {
            Some(deadline) if now >= deadline => Err(DomainError::window_closed(format!(
                "round {} window closed",
                self.session.round_no()
            ))),
            _ => Ok(()),
        }
    }
}

/// One registered session. All access goes through a single lock, so a
/// resolution pass never overlaps a submission.
#[derive(Debug)]
pub struct LiveSession {
    chat_id: ChatId,
    state: Mutex<LiveState>,
    cancel: CancellationToken,
}

impl LiveSession {
    fn new(session: Session) -> Self {
        Self {
            chat_id: session.chat_id(),
            state: Mutex::new(LiveState {
                session,
                deadline: None,
            }),
            cancel: CancellationToken::new(),
        }
    }

    pub fn chat_id(&self) -> ChatId {
        self.chat_id
    }

    /// Never hold the guard across an await.
    pub fn lock(&self) -> MutexGuard<'_, LiveState> {
        self.state.lock()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.lock().session.snapshot()
    }

    /// Open window as `(deadline, round_no)`.
    pub fn window(&self) -> Option<(Instant, u32)> {
        let state = self.state.lock();
        state.deadline.map(|d| (d, state.session.round_no()))
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub(crate) fn cancel(&self) {
        self.cancel.cancel();
    }
}

#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: DashMap<ChatId, Arc<LiveSession>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fresh session. One per chat.
    pub fn create(&self, session: Session) -> Result<Arc<LiveSession>, DomainError> {
        let chat_id = session.chat_id();
        match self.sessions.entry(chat_id) {
            Entry::Occupied(_) => Err(DomainError::conflict(
                ConflictKind::SessionExists,
                format!("chat {chat_id} already has a game"),
            )),
            Entry::Vacant(slot) => {
                let live = Arc::new(LiveSession::new(session));
                slot.insert(live.clone());
                Ok(live)
            }
        }
    }

    pub fn get(&self, chat_id: ChatId) -> Result<Arc<LiveSession>, DomainError> {
        self.sessions
            .get(&chat_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| {
                DomainError::not_found(NotFoundKind::Session, format!("no game in chat {chat_id}"))
            })
    }

    /// Remove `live` and cancel its window. A newer session registered under
    /// the same chat is left alone. Returns whether anything was removed.
    pub fn destroy(&self, live: &Arc<LiveSession>) -> bool {
        live.cancel();
        self.sessions
            .remove_if(&live.chat_id(), |_, current| Arc::ptr_eq(current, live))
            .is_some()
    }

    pub fn contains(&self, chat_id: ChatId) -> bool {
        self.sessions.contains_key(&chat_id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn chat_ids(&self) -> Vec<ChatId> {
        let mut ids: Vec<ChatId> = self.sessions.iter().map(|e| *e.key()).collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_session_per_chat() {
        let registry = SessionRegistry::new();
        registry.create(Session::new(1, 10, 0)).unwrap();
        let err = registry.create(Session::new(1, 11, 0)).unwrap_err();
        assert!(matches!(
            err,
            DomainError::Conflict(ConflictKind::SessionExists, _)
        ));
        registry.create(Session::new(2, 11, 0)).unwrap();
        assert_eq!(registry.chat_ids(), vec![1, 2]);
    }

    #[test]
    fn destroy_cancels_and_removes() {
        let registry = SessionRegistry::new();
        let live = registry.create(Session::new(1, 10, 0)).unwrap();
        let token = live.cancel_token();
        assert!(registry.destroy(&live));
        assert!(token.is_cancelled());
        assert!(matches!(
            registry.get(1),
            Err(DomainError::NotFound(NotFoundKind::Session, _))
        ));
        assert!(!registry.destroy(&live));
    }

    #[test]
    fn destroying_a_stale_handle_keeps_the_replacement() {
        let registry = SessionRegistry::new();
        let old = registry.create(Session::new(1, 10, 0)).unwrap();
        registry.destroy(&old);
        let new = registry.create(Session::new(1, 12, 0)).unwrap();
        assert!(!registry.destroy(&old));
        assert!(registry.contains(1));
        assert!(!new.is_cancelled());
    }

    #[test]
    fn expired_deadline_closes_window() {
        let registry = SessionRegistry::new();
        let live = registry.create(Session::new(1, 10, 0)).unwrap();
        let now = Instant::now();
        {
            let mut state = live.lock();
            assert!(state.ensure_window_open(now).is_ok());
            state.deadline = Some(now);
        }
        let err = live.lock().ensure_window_open(now).unwrap_err();
        assert!(matches!(err, DomainError::WindowClosed(_)));
    }
}

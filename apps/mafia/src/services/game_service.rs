//! Game service: runs sessions from the registry and delivers what they
//! produce.
//!
//! Every call locks one session, applies the domain operation, collects the
//! notices it implies and releases the lock before anything is delivered.

use std::sync::Arc;

use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::domain::roles::{ActionKind, Faction, Role};
use crate::domain::session::{RoundOutcome, Session, SessionSnapshot};
use crate::domain::state::{ChatId, Phase, Player, PlayerId, Submission};
use crate::errors::domain::{DomainError, NotFoundKind, ValidationKind};
use crate::ports::economy::Economy;
use crate::ports::messenger::Messenger;
use crate::ports::notices::{DeathNotice, PrivateNotice, PublicNotice};
use crate::services::registry::{LiveSession, SessionRegistry};
use crate::services::round_driver;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveOutcome {
    pub player: Player,
    /// The roster emptied and the session was destroyed.
    pub session_closed: bool,
}

/// A resolved round as announced to the chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundReport {
    pub outcome: RoundOutcome,
    pub deaths: Vec<DeathNotice>,
}

impl RoundReport {
    pub fn winner(&self) -> Option<Faction> {
        self.outcome.verdict.winner()
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome.verdict.is_terminal()
    }
}

/// Notices gathered under the session lock, delivered after it is released.
#[derive(Debug, Default)]
struct Outbox {
    private: Vec<(PlayerId, PrivateNotice)>,
    public: Vec<PublicNotice>,
}

/// A dying player as seen just after resolution.
struct Dying {
    id: PlayerId,
    name: String,
    role: Option<Role>,
}

#[derive(Clone)]
pub struct GameService {
    registry: Arc<SessionRegistry>,
    config: Arc<EngineConfig>,
    messenger: Arc<dyn Messenger>,
    economy: Arc<dyn Economy>,
}

impl GameService {
    pub fn new(
        config: EngineConfig,
        messenger: Arc<dyn Messenger>,
        economy: Arc<dyn Economy>,
    ) -> Self {
        Self {
            registry: Arc::new(SessionRegistry::new()),
            config: Arc::new(config),
            messenger,
            economy,
        }
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Open an empty session in `chat_id` with a fresh random seed.
    pub fn create_session(
        &self,
        chat_id: ChatId,
        creator: PlayerId,
    ) -> Result<SessionSnapshot, DomainError> {
        self.create_session_with_seed(chat_id, creator, rand::random())
    }

    pub fn create_session_with_seed(
        &self,
        chat_id: ChatId,
        creator: PlayerId,
        seed: u64,
    ) -> Result<SessionSnapshot, DomainError> {
        let live = self.registry.create(Session::new(chat_id, creator, seed))?;
        info!(chat_id, creator, "Session created");
        Ok(live.snapshot())
    }

    /// Add a player during registration. Returns the roster size.
    pub fn join(
        &self,
        chat_id: ChatId,
        player: PlayerId,
        name: impl Into<String>,
    ) -> Result<usize, DomainError> {
        let live = self.registry.get(chat_id)?;
        self.join_live(&live, player, name)
    }

    pub(crate) fn join_live(
        &self,
        live: &LiveSession,
        player: PlayerId,
        name: impl Into<String>,
    ) -> Result<usize, DomainError> {
        let chat_id = live.chat_id();
        let players = {
            let mut state = live.lock();
            // A handle fetched just before the session closed.
            if live.is_cancelled() {
                return Err(DomainError::not_found(
                    NotFoundKind::Session,
                    format!("game in chat {chat_id} was closed"),
                ));
            }
            state.session.join(player, name)?;
            state.session.roster().len()
        };
        debug!(chat_id, player, players, "Player joined");
        Ok(players)
    }

    /// Remove a player in any phase. The session is destroyed when its
    /// roster empties.
    pub fn leave(&self, chat_id: ChatId, player: PlayerId) -> Result<LeaveOutcome, DomainError> {
        let live = self.registry.get(chat_id)?;
        let (left, empty) = {
            let mut state = live.lock();
            let left = state.session.leave(player)?;
            let empty = state.session.roster().is_empty();
            // Destroyed under the lock so no join lands in between.
            if empty {
                self.registry.destroy(&live);
            }
            (left, empty)
        };
        if empty {
            info!(chat_id, "Last player left, session destroyed");
        } else {
            debug!(chat_id, player, "Player left");
        }
        Ok(LeaveOutcome {
            player: left,
            session_closed: empty,
        })
    }

    /// Deal roles, reveal them privately and open the first night.
    pub async fn start_game(
        &self,
        chat_id: ChatId,
        requester: PlayerId,
    ) -> Result<SessionSnapshot, DomainError> {
        let live = self.registry.get(chat_id)?;
        let (outbox, snapshot) = {
            let mut state = live.lock();
            let assignment = state.session.start(requester)?;
            state.deadline = self.next_deadline();

            let mut outbox = Outbox::default();
            for (player, role) in assignment {
                outbox
                    .private
                    .push((player, PrivateNotice::RoleReveal { chat_id, role }));
            }
            self.open_window_notices(&state.session, &mut outbox);
            (outbox, state.session.snapshot())
        };

        info!(chat_id, players = snapshot.players.len(), "Game started");
        self.deliver(chat_id, outbox).await;

        if self.config.auto_advance {
            round_driver::spawn(self.clone(), live);
        }
        Ok(snapshot)
    }

    pub fn submit_night_action(
        &self,
        chat_id: ChatId,
        actor: PlayerId,
        role_claimed: Role,
        kind: ActionKind,
        target: PlayerId,
    ) -> Result<Submission, DomainError> {
        let live = self.registry.get(chat_id)?;
        let mut state = live.lock();
        ensure_not_stopped(&live)?;
        state.ensure_window_open(Instant::now())?;
        let submission = state
            .session
            .submit_night_action(actor, role_claimed, kind, target)?;
        debug!(chat_id, actor, ?kind, target, ?submission, "Night action recorded");
        Ok(submission)
    }

    /// Returns the voter's previous target, if they changed their vote.
    pub fn submit_vote(
        &self,
        chat_id: ChatId,
        voter: PlayerId,
        target: PlayerId,
    ) -> Result<Option<PlayerId>, DomainError> {
        let live = self.registry.get(chat_id)?;
        let mut state = live.lock();
        ensure_not_stopped(&live)?;
        state.ensure_window_open(Instant::now())?;
        let previous = state.session.submit_vote(voter, target)?;
        debug!(chat_id, voter, target, ?previous, "Vote recorded");
        Ok(previous)
    }

    /// Close the open window now and resolve it.
    pub async fn resolve_round(&self, chat_id: ChatId) -> Result<RoundReport, DomainError> {
        let live = self.registry.get(chat_id)?;
        self.close_window(&live, None).await?.ok_or_else(|| {
            DomainError::validation_other(format!("chat {chat_id} moved on before resolution"))
        })
    }

    /// Resolve the window of `live`. With `expected_round`, a window that
    /// was already resolved by someone else is skipped and `Ok(None)` comes
    /// back.
    pub(crate) async fn close_window(
        &self,
        live: &Arc<LiveSession>,
        expected_round: Option<u32>,
    ) -> Result<Option<RoundReport>, DomainError> {
        let chat_id = live.chat_id();
        let (outcome, dying, results, next) = {
            let mut state = live.lock();
            ensure_not_stopped(live)?;
            if expected_round.is_some_and(|round| round != state.session.round_no()) {
                return Ok(None);
            }

            let outcome = state.session.resolve_round()?;
            let dying: Vec<Dying> = outcome
                .deaths
                .iter()
                .filter_map(|id| state.session.roster().get(*id))
                .map(|p| Dying {
                    id: p.id,
                    name: p.name.clone(),
                    role: p.role,
                })
                .collect();

            let mut results = Outbox::default();
            for investigation in &outcome.investigations {
                results.private.push((
                    investigation.investigator,
                    PrivateNotice::InvestigationResult {
                        chat_id,
                        target: investigation.target,
                        finding: investigation.finding,
                    },
                ));
            }

            let mut next = Outbox::default();
            if outcome.verdict.is_terminal() {
                state.deadline = None;
                next.public.push(PublicNotice::GameOver {
                    verdict: outcome.verdict,
                    players: state.session.snapshot().players,
                });
            } else {
                state.deadline = self.next_deadline();
                self.open_window_notices(&state.session, &mut next);
            }
            (outcome, dying, results, next)
        };

        let ended_here = outcome.verdict.is_terminal() && self.registry.destroy(live);
        if ended_here {
            info!(chat_id, verdict = ?outcome.verdict, "Game over");
        }
        info!(
            chat_id,
            round = outcome.round_no,
            resolved = ?outcome.resolved,
            deaths = outcome.deaths.len(),
            "Round resolved"
        );

        let deaths = self.death_notices(chat_id, dying).await;
        if live.is_cancelled() && !ended_here {
            info!(chat_id, round = outcome.round_no, "Stopped during resolution, nothing announced");
            return Ok(Some(RoundReport { outcome, deaths }));
        }
        self.deliver(chat_id, results).await;
        self.broadcast(
            chat_id,
            PublicNotice::RoundSummary {
                round_no: outcome.round_no,
                resolved: outcome.resolved,
                deaths: deaths.clone(),
                executed: outcome.executed,
                immortal_spared: outcome.immortal_spared,
            },
        )
        .await;
        self.deliver(chat_id, next).await;

        Ok(Some(RoundReport { outcome, deaths }))
    }

    /// Destroy the session on request of its creator or an admin.
    pub async fn stop(&self, chat_id: ChatId, requester: PlayerId) -> Result<(), DomainError> {
        let live = self.registry.get(chat_id)?;
        let creator = live.lock().session.creator_id();
        if requester != creator && !self.config.is_admin(requester) {
            return Err(DomainError::validation(
                ValidationKind::NotAuthorized,
                format!("player {requester} may not stop the game in chat {chat_id}"),
            ));
        }
        self.registry.destroy(&live);
        info!(chat_id, requester, "Game stopped");
        self.broadcast(chat_id, PublicNotice::Stopped { by: requester })
            .await;
        Ok(())
    }

    /// Forward a line from one mafia member to the others. Returns who got it.
    pub async fn relay_mafia_chat(
        &self,
        chat_id: ChatId,
        sender: PlayerId,
        text: impl Into<String>,
    ) -> Result<Vec<PlayerId>, DomainError> {
        let live = self.registry.get(chat_id)?;
        let (recipients, from_name) = {
            let state = live.lock();
            let recipients = state.session.mafia_chat_recipients(sender)?;
            let name = state.session.roster().require(sender)?.name.clone();
            (recipients, name)
        };

        let text = text.into();
        let mut outbox = Outbox::default();
        for player in &recipients {
            outbox.private.push((
                *player,
                PrivateNotice::MafiaChat {
                    chat_id,
                    from: sender,
                    from_name: from_name.clone(),
                    text: text.clone(),
                },
            ));
        }
        self.deliver(chat_id, outbox).await;
        Ok(recipients)
    }

    pub fn snapshot(&self, chat_id: ChatId) -> Result<SessionSnapshot, DomainError> {
        Ok(self.registry.get(chat_id)?.snapshot())
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.config
            .auto_advance
            .then(|| Instant::now() + self.config.round_window)
    }

    /// Phase announcement, plus action prompts when a night opens.
    fn open_window_notices(&self, session: &Session, outbox: &mut Outbox) {
        let living = session.roster().living_ids();
        outbox.public.push(PublicNotice::PhaseChange {
            phase: session.phase(),
            round_no: session.round_no(),
            window_secs: self.config.round_window.as_secs(),
            candidates: living.clone(),
        });
        if session.phase() != Phase::Night {
            return;
        }

        let sniper_used = session.flags().sniper_used;
        for player in session.roster().living() {
            let Some(role) = player.role else { continue };
            let actions: Vec<ActionKind> = role
                .night_actions()
                .iter()
                .copied()
                .filter(|kind| !(sniper_used && *kind == ActionKind::SniperShot))
                .collect();
            if actions.is_empty() {
                continue;
            }
            outbox.private.push((
                player.id,
                PrivateNotice::ActionPrompt {
                    chat_id: session.chat_id(),
                    round_no: session.round_no(),
                    role,
                    actions,
                    targets: living.clone(),
                },
            ));
        }
    }

    async fn death_notices(&self, chat_id: ChatId, dying: Vec<Dying>) -> Vec<DeathNotice> {
        let mut notices = Vec::with_capacity(dying.len());
        for d in dying {
            let anonymous = match self.economy.has_anonymity(d.id).await {
                Ok(anonymous) => anonymous,
                Err(err) => {
                    // Unknown purchase state: keep the role hidden.
                    warn!(chat_id, player = d.id, error = %err, "Anonymity lookup failed");
                    true
                }
            };
            notices.push(DeathNotice {
                player: d.id,
                name: d.name,
                role: if anonymous { None } else { d.role },
            });
        }
        notices
    }

    /// Delivery failures are logged and never interrupt the game.
    async fn deliver(&self, chat_id: ChatId, outbox: Outbox) {
        for (player, notice) in outbox.private {
            if let Err(err) = self.messenger.send_private(player, notice).await {
                warn!(chat_id, player, error = %err, "Private delivery failed");
            }
        }
        for notice in outbox.public {
            self.broadcast(chat_id, notice).await;
        }
    }

    async fn broadcast(&self, chat_id: ChatId, notice: PublicNotice) {
        if let Err(err) = self.messenger.broadcast(chat_id, notice).await {
            warn!(chat_id, error = %err, "Broadcast failed");
        }
    }
}

fn ensure_not_stopped(live: &LiveSession) -> Result<(), DomainError> {
    if live.is_cancelled() {
        return Err(DomainError::window_closed(format!(
            "game in chat {} was stopped",
            live.chat_id()
        )));
    }
    Ok(())
}

//! One game's state and the synchronous operations on it.
//!
//! Every operation validates fully before mutating, so a rejected call
//! leaves the session exactly as it was.

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::domain::assignment::assign_roles;
use crate::domain::day::tally_votes;
use crate::domain::night::{resolve_night, Investigation, Vengeance};
use crate::domain::roles::{ActionKind, Role};
use crate::domain::rules::MAX_PLAYERS;
use crate::domain::seed_derivation::{derive_assignment_seed, derive_night_seed};
use crate::domain::state::{
    ChatId, DayVotes, NightAction, NightActions, OneShotFlags, Phase, Player, PlayerId, Roster,
    Submission,
};
use crate::domain::victory::{evaluate, Verdict};
use crate::errors::domain::{ConflictKind, DomainError, ValidationKind};

#[derive(Debug, Clone)]
pub struct Session {
    chat_id: ChatId,
    creator_id: PlayerId,
    seed: u64,
    phase: Phase,
    /// 1-based count of collection windows; 0 during registration.
    round_no: u32,
    roster: Roster,
    night_actions: NightActions,
    day_votes: DayVotes,
    flags: OneShotFlags,
}

/// Everything one resolution pass produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub round_no: u32,
    /// Phase whose window was resolved.
    pub resolved: Phase,
    /// Players marked dead by this pass, in id order.
    pub deaths: Vec<PlayerId>,
    /// Day only: the executed player.
    pub executed: Option<PlayerId>,
    /// Day only: votes per target.
    pub vote_counts: BTreeMap<PlayerId, usize>,
    pub investigations: Vec<Investigation>,
    pub vengeance: Option<Vengeance>,
    pub immortal_spared: bool,
    pub verdict: Verdict,
    /// Phase the session is in afterwards.
    pub next_phase: Phase,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    pub name: String,
    pub alive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

/// Read-only copy of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub chat_id: ChatId,
    pub creator_id: PlayerId,
    pub phase: Phase,
    pub round_no: u32,
    pub players: Vec<PlayerSnapshot>,
}

impl SessionSnapshot {
    /// Same snapshot with every role hidden.
    pub fn public(mut self) -> Self {
        for player in &mut self.players {
            player.role = None;
        }
        self
    }
}

impl Session {
    pub fn new(chat_id: ChatId, creator_id: PlayerId, seed: u64) -> Self {
        Self {
            chat_id,
            creator_id,
            seed,
            phase: Phase::Registration,
            round_no: 0,
            roster: Roster::new(),
            night_actions: NightActions::new(),
            day_votes: DayVotes::new(),
            flags: OneShotFlags::default(),
        }
    }

    pub fn chat_id(&self) -> ChatId {
        self.chat_id
    }

    pub fn creator_id(&self) -> PlayerId {
        self.creator_id
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn round_no(&self) -> u32 {
        self.round_no
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn night_actions(&self) -> &NightActions {
        &self.night_actions
    }

    pub fn day_votes(&self) -> &DayVotes {
        &self.day_votes
    }

    pub fn flags(&self) -> OneShotFlags {
        self.flags
    }

    fn require_phase(&self, expected: Phase, op: &str) -> Result<(), DomainError> {
        if self.phase != expected {
            return Err(DomainError::validation(
                ValidationKind::WrongPhase,
                format!("{op} needs phase {expected:?}, session is in {:?}", self.phase),
            ));
        }
        Ok(())
    }

    fn require_living_target(&self, target: PlayerId) -> Result<(), DomainError> {
        if !self.roster.is_alive(target) {
            return Err(DomainError::validation(
                ValidationKind::InvalidTarget,
                format!("player {target} is not a living member of this game"),
            ));
        }
        Ok(())
    }

    pub fn join(&mut self, player_id: PlayerId, name: impl Into<String>) -> Result<(), DomainError> {
        self.require_phase(Phase::Registration, "join")?;
        if self.roster.contains(player_id) {
            return Err(DomainError::conflict(
                ConflictKind::AlreadyJoined,
                format!("player {player_id} already joined"),
            ));
        }
        if self.roster.len() >= MAX_PLAYERS {
            return Err(DomainError::validation(
                ValidationKind::RosterFull,
                format!("roster is full ({MAX_PLAYERS}/{MAX_PLAYERS})"),
            ));
        }
        self.roster.insert(Player::new(player_id, name));
        Ok(())
    }

    /// Remove a player. Mid-game, their pending actions and votes, and any
    /// aimed at them, go with them.
    pub fn leave(&mut self, player_id: PlayerId) -> Result<Player, DomainError> {
        self.roster.require(player_id)?;
        self.night_actions.forget(player_id);
        self.day_votes
            .retain(|voter, target| *voter != player_id && *target != player_id);
        self.roster
            .remove(player_id)
            .ok_or_else(|| DomainError::validation_other("roster changed during leave"))
    }

    /// Deal roles and open the first night.
    pub fn start(&mut self, requester: PlayerId) -> Result<Vec<(PlayerId, Role)>, DomainError> {
        if requester != self.creator_id {
            return Err(DomainError::validation(
                ValidationKind::NotCreator,
                format!("only player {} may start this game", self.creator_id),
            ));
        }
        self.require_phase(Phase::Registration, "start")?;

        let assignment = assign_roles(&self.roster.ids(), derive_assignment_seed(self.seed))?;
        for (id, role) in &assignment {
            if let Some(player) = self.roster.get_mut(*id) {
                player.role = Some(*role);
            }
        }
        self.open_round(Phase::Night);
        Ok(assignment)
    }

    #[cfg(test)]
    pub(crate) fn install_roles(&mut self, roles: &[Role]) {
        for (id, role) in self.roster.ids().into_iter().zip(roles) {
            if let Some(player) = self.roster.get_mut(id) {
                player.role = Some(*role);
            }
        }
        self.open_round(Phase::Night);
    }

    fn open_round(&mut self, phase: Phase) {
        self.phase = phase;
        self.round_no += 1;
        self.night_actions.clear();
        self.day_votes.clear();
    }

    /// Record a night action. Co-holders of a role share the slot for each
    /// action kind, so the last accepted submission replaces earlier ones.
    pub fn submit_night_action(
        &mut self,
        actor: PlayerId,
        role_claimed: Role,
        kind: ActionKind,
        target: PlayerId,
    ) -> Result<Submission, DomainError> {
        self.require_phase(Phase::Night, "night action")?;
        let player = self.roster.require(actor)?;
        if !player.has_role(role_claimed) || !role_claimed.can_perform(kind) {
            return Err(DomainError::validation(
                ValidationKind::NotYourRole,
                format!("player {actor} cannot perform {kind:?} as {role_claimed}"),
            ));
        }
        if !player.alive {
            return Err(DomainError::validation(
                ValidationKind::ActorDead,
                format!("player {actor} is dead"),
            ));
        }
        if kind == ActionKind::SniperShot && self.flags.sniper_used {
            return Err(DomainError::validation(
                ValidationKind::AbilityExhausted,
                "the sniper has already fired this game",
            ));
        }
        self.require_living_target(target)?;

        Ok(self
            .night_actions
            .submit(kind, NightAction { actor, target }))
    }

    /// Record a day vote. Returns the voter's previous target, if any.
    pub fn submit_vote(
        &mut self,
        voter: PlayerId,
        target: PlayerId,
    ) -> Result<Option<PlayerId>, DomainError> {
        self.require_phase(Phase::Day, "vote")?;
        let player = self.roster.require(voter)?;
        if !player.alive {
            return Err(DomainError::validation(
                ValidationKind::VoterDead,
                format!("player {voter} is dead"),
            ));
        }
        self.require_living_target(target)?;
        Ok(self.day_votes.insert(voter, target))
    }

    /// Resolve the open window, apply deaths, check for a winner and either
    /// open the next window or end the session.
    pub fn resolve_round(&mut self) -> Result<RoundOutcome, DomainError> {
        let resolved = self.phase;
        let round_no = self.round_no;
        let mut outcome = RoundOutcome {
            round_no,
            resolved,
            deaths: Vec::new(),
            executed: None,
            vote_counts: BTreeMap::new(),
            investigations: Vec::new(),
            vengeance: None,
            immortal_spared: false,
            verdict: Verdict::Undecided,
            next_phase: resolved,
        };

        match resolved {
            Phase::Night => {
                let mut rng = ChaCha8Rng::seed_from_u64(derive_night_seed(self.seed, round_no));
                let night = resolve_night(&self.roster, &self.night_actions, &self.flags, &mut rng);
                night.apply_flags(&mut self.flags);
                outcome.deaths = self.apply_deaths(night.deaths.iter().copied());
                outcome.investigations = night.investigations;
                outcome.vengeance = night.vengeance;
                outcome.immortal_spared = night.immortal_spared;
            }
            Phase::Day => {
                let tally = tally_votes(&self.day_votes);
                outcome.deaths = self.apply_deaths(tally.executed);
                outcome.executed = tally.executed;
                outcome.vote_counts = tally.counts;
            }
            Phase::Registration | Phase::Ended => {
                return Err(DomainError::validation(
                    ValidationKind::WrongPhase,
                    format!("no round to resolve in phase {resolved:?}"),
                ));
            }
        }

        outcome.verdict = evaluate(&self.roster);
        if outcome.verdict.is_terminal() {
            self.phase = Phase::Ended;
            self.night_actions.clear();
            self.day_votes.clear();
        } else if resolved == Phase::Night {
            self.open_round(Phase::Day);
        } else {
            self.open_round(Phase::Night);
        }
        outcome.next_phase = self.phase;
        Ok(outcome)
    }

    /// Mark players dead. Returns the ones that were alive before.
    pub fn apply_deaths(&mut self, ids: impl IntoIterator<Item = PlayerId>) -> Vec<PlayerId> {
        let mut died = Vec::new();
        for id in ids {
            if let Some(player) = self.roster.get_mut(id) {
                if player.alive {
                    player.alive = false;
                    died.push(id);
                }
            }
        }
        died
    }

    /// Other living mafia-aligned players who should receive `sender`'s line.
    pub fn mafia_chat_recipients(&self, sender: PlayerId) -> Result<Vec<PlayerId>, DomainError> {
        let player = self.roster.require(sender)?;
        if !player.is_mafia_aligned() {
            return Err(DomainError::validation(
                ValidationKind::NotYourRole,
                format!("player {sender} is not in the mafia"),
            ));
        }
        if !player.alive {
            return Err(DomainError::validation(
                ValidationKind::ActorDead,
                format!("player {sender} is dead"),
            ));
        }
        Ok(self
            .roster
            .living_mafia()
            .into_iter()
            .filter(|id| *id != sender)
            .collect())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            chat_id: self.chat_id,
            creator_id: self.creator_id,
            phase: self.phase,
            round_no: self.round_no,
            players: self
                .roster
                .iter()
                .map(|p| PlayerSnapshot {
                    id: p.id,
                    name: p.name.clone(),
                    alive: p.alive,
                    role: p.role,
                })
                .collect(),
        }
    }
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::roles::{ActionKind, Role};
use crate::errors::domain::{DomainError, NotFoundKind};

pub type PlayerId = i64;
pub type ChatId = i64;

/// Session progression. Only ever advances
/// Registration → Night → Day → Night → … → Ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Accepting joins; roles not dealt.
    Registration,
    /// Night roles submit targeted actions.
    Night,
    /// Living players vote to execute.
    Day,
    /// Absorbing; the session is about to be removed.
    Ended,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// `None` until role assignment runs.
    pub role: Option<Role>,
    pub alive: bool,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            role: None,
            alive: true,
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role == Some(role)
    }

    pub fn is_mafia_aligned(&self) -> bool {
        self.role.is_some_and(Role::is_mafia_aligned)
    }
}

/// Players of one session keyed by id. Iteration is in id order, which keeps
/// seeded shuffles reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    players: BTreeMap<PlayerId, Player>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.players.contains_key(&id)
    }

    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(&id)
    }

    pub fn require(&self, id: PlayerId) -> Result<&Player, DomainError> {
        self.players.get(&id).ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Player, format!("player {id} is not in the roster"))
        })
    }

    pub(crate) fn insert(&mut self, player: Player) {
        self.players.insert(player.id, player);
    }

    pub(crate) fn remove(&mut self, id: PlayerId) -> Option<Player> {
        self.players.remove(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    pub fn ids(&self) -> Vec<PlayerId> {
        self.players.keys().copied().collect()
    }

    pub fn living(&self) -> impl Iterator<Item = &Player> {
        self.players.values().filter(|p| p.alive)
    }

    pub fn living_ids(&self) -> Vec<PlayerId> {
        self.living().map(|p| p.id).collect()
    }

    pub fn is_alive(&self, id: PlayerId) -> bool {
        self.players.get(&id).is_some_and(|p| p.alive)
    }

    pub fn role_of(&self, id: PlayerId) -> Option<Role> {
        self.players.get(&id).and_then(|p| p.role)
    }

    /// First living holder of `role`, in id order.
    pub fn living_holder(&self, role: Role) -> Option<PlayerId> {
        self.living().find(|p| p.has_role(role)).map(|p| p.id)
    }

    pub fn living_with_role(&self, role: Role) -> Vec<PlayerId> {
        self.living()
            .filter(|p| p.has_role(role))
            .map(|p| p.id)
            .collect()
    }

    pub fn living_mafia(&self) -> Vec<PlayerId> {
        self.living()
            .filter(|p| p.is_mafia_aligned())
            .map(|p| p.id)
            .collect()
    }
}

impl FromIterator<Player> for Roster {
    fn from_iter<T: IntoIterator<Item = Player>>(iter: T) -> Self {
        Self {
            players: iter.into_iter().map(|p| (p.id, p)).collect(),
        }
    }
}

/// One-shot, per-game flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneShotFlags {
    pub sniper_used: bool,
    pub vengeance_used: bool,
    /// Set whenever the immortal survives a lethal night. Never consulted to
    /// stop the protection from firing again.
    pub immortal_spared: bool,
}

/// A submitted night action: who acted and on whom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightAction {
    pub actor: PlayerId,
    pub target: PlayerId,
}

/// What a submission did to its action slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// The slot was empty.
    Recorded,
    /// The slot held an earlier submission, now overwritten. Co-holders of a
    /// role share one slot and the last submission wins.
    Replaced { previous: NightAction },
}

/// Pending night actions, one slot per action kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightActions {
    slots: BTreeMap<ActionKind, NightAction>,
}

impl NightActions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `action` into the slot for `kind`, overwriting any earlier one.
    pub fn submit(&mut self, kind: ActionKind, action: NightAction) -> Submission {
        match self.slots.insert(kind, action) {
            Some(previous) => Submission::Replaced { previous },
            None => Submission::Recorded,
        }
    }

    pub fn get(&self, kind: ActionKind) -> Option<&NightAction> {
        self.slots.get(&kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ActionKind, &NightAction)> {
        self.slots.iter().map(|(k, a)| (*k, a))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Drop every slot that mentions `player` as actor or target.
    pub(crate) fn forget(&mut self, player: PlayerId) {
        self.slots
            .retain(|_, a| a.actor != player && a.target != player);
    }
}

impl FromIterator<(ActionKind, NightAction)> for NightActions {
    fn from_iter<T: IntoIterator<Item = (ActionKind, NightAction)>>(iter: T) -> Self {
        let mut actions = NightActions::new();
        for (kind, action) in iter {
            actions.submit(kind, action);
        }
        actions
    }
}

/// Pending day votes: voter → target. A voter re-voting replaces their vote.
pub type DayVotes = BTreeMap<PlayerId, PlayerId>;

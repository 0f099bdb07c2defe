//! Night resolution: one round's action slots in, one death set out.
//!
//! The resolver trusts its inputs. Role ownership, liveness and the round
//! window are all checked when actions are submitted.
//!
//! Resolution order:
//! 1. block target recorded
//! 2. heal target recorded
//! 3. guard paired with the living bodyguard
//! 4. independent kills (maniac, werewolf, sniper) unless their actor is blocked
//! 5. suicide kill takes actor and target together
//! 6. faction kill, redirected onto the bodyguard when it hits the guarded player
//! 7. heal removes its target from the death set, whatever the source
//! 8. a living immortal is removed from the death set
//! 9. a dying якудза takes one random living mafia-aligned player along, once per game

use std::collections::BTreeSet;

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::roles::{ActionKind, Role};
use crate::domain::state::{NightActions, OneShotFlags, PlayerId, Roster};

/// Bodyguard standing in for the player they protect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardPairing {
    pub guard: PlayerId,
    pub protected: PlayerId,
}

/// Retaliation triggered by a dying якудза.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vengeance {
    pub avenger: PlayerId,
    /// `None` when no mafia-aligned player was left to take.
    pub victim: Option<PlayerId>,
}

/// What an investigator learned about their target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum Finding {
    /// Commissar check: is the target mafia-aligned?
    MafiaAligned(bool),
    /// Don check: is the target the commissar?
    Commissar(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Investigation {
    pub investigator: PlayerId,
    pub target: PlayerId,
    pub finding: Finding,
}

/// Output of one night.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NightResolution {
    pub deaths: BTreeSet<PlayerId>,
    pub immortal_spared: bool,
    pub vengeance: Option<Vengeance>,
    pub sniper_fired: bool,
    pub investigations: Vec<Investigation>,
}

impl NightResolution {
    /// Fold this night's one-shot consequences into the session flags.
    pub fn apply_flags(&self, flags: &mut OneShotFlags) {
        if self.immortal_spared {
            flags.immortal_spared = true;
        }
        if self.vengeance.is_some() {
            flags.vengeance_used = true;
        }
        if self.sniper_fired {
            flags.sniper_used = true;
        }
    }
}

/// Kill sources that act independently of each other, in evaluation order.
const INDEPENDENT_KILLS: [ActionKind; 3] = [
    ActionKind::ManiacKill,
    ActionKind::WerewolfKill,
    ActionKind::SniperShot,
];

/// Resolve one night.
pub fn resolve_night<R: Rng + ?Sized>(
    roster: &Roster,
    actions: &NightActions,
    flags: &OneShotFlags,
    rng: &mut R,
) -> NightResolution {
    let blocked: BTreeSet<PlayerId> = actions
        .get(ActionKind::Block)
        .map(|a| a.target)
        .into_iter()
        .collect();

    let heal_target = actions.get(ActionKind::Heal).map(|a| a.target);

    let guard = actions.get(ActionKind::Guard).and_then(|a| {
        roster
            .living_holder(Role::Bodyguard)
            .map(|guard| GuardPairing {
                guard,
                protected: a.target,
            })
    });

    // A blocked actor's harmful actions never land.
    let effective = |kind: ActionKind| {
        actions
            .get(kind)
            .filter(|a| !(kind.is_harmful() && blocked.contains(&a.actor)))
    };

    let mut deaths = BTreeSet::new();

    for kind in INDEPENDENT_KILLS {
        if let Some(action) = effective(kind) {
            deaths.insert(action.target);
        }
    }

    if let Some(action) = effective(ActionKind::SuicideKill) {
        if let Some(suicide) = roster.living_holder(Role::Suicide) {
            if !deaths.contains(&suicide) {
                deaths.insert(suicide);
                deaths.insert(action.target);
            }
        }
    }

    if let Some(action) = effective(ActionKind::FactionKill) {
        let immune = roster.role_of(action.target) == Some(Role::Vagrant);
        if !immune {
            match guard {
                Some(pairing) if pairing.protected == action.target => {
                    deaths.insert(pairing.guard);
                }
                _ => {
                    deaths.insert(action.target);
                }
            }
        }
    }

    if let Some(healed) = heal_target {
        deaths.remove(&healed);
    }

    // Fires every night the immortal would die.
    let mut immortal_spared = false;
    if let Some(immortal) = roster.living_holder(Role::Immortal) {
        if deaths.remove(&immortal) {
            immortal_spared = true;
        }
    }

    let mut vengeance = None;
    if !flags.vengeance_used {
        let avenger = deaths
            .iter()
            .copied()
            .find(|id| roster.role_of(*id) == Some(Role::Yakuza));
        if let Some(avenger) = avenger {
            let candidates: Vec<PlayerId> = roster
                .living_mafia()
                .into_iter()
                .filter(|id| !deaths.contains(id))
                .collect();
            let victim = candidates.choose(rng).copied();
            if let Some(victim) = victim {
                deaths.insert(victim);
            }
            vengeance = Some(Vengeance { avenger, victim });
        }
    }

    NightResolution {
        deaths,
        immortal_spared,
        vengeance,
        sniper_fired: actions.get(ActionKind::SniperShot).is_some(),
        investigations: investigations(roster, actions),
    }
}

fn investigations(roster: &Roster, actions: &NightActions) -> Vec<Investigation> {
    let mut out = Vec::new();
    if let Some(action) = actions.get(ActionKind::CommissarCheck) {
        let mafia = roster.role_of(action.target).is_some_and(Role::is_mafia_aligned);
        out.push(Investigation {
            investigator: action.actor,
            target: action.target,
            finding: Finding::MafiaAligned(mafia),
        });
    }
    if let Some(action) = actions.get(ActionKind::DonCheck) {
        let commissar = roster.role_of(action.target) == Some(Role::Commissar);
        out.push(Investigation {
            investigator: action.actor,
            target: action.target,
            finding: Finding::Commissar(commissar),
        });
    }
    out
}

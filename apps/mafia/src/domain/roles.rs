//! Role catalog: the 20 role identifiers, their factions and night abilities.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::domain::{DomainError, ValidationKind};

/// A role from the fixed catalog. Serialized with its catalog identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "мафия")]
    Mafia,
    #[serde(rename = "дон")]
    Don,
    #[serde(rename = "комиссар")]
    Commissar,
    #[serde(rename = "доктор")]
    Doctor,
    #[serde(rename = "любовница")]
    Mistress,
    #[serde(rename = "маньяк")]
    Maniac,
    #[serde(rename = "адвокат")]
    Lawyer,
    #[serde(rename = "шериф")]
    Sheriff,
    #[serde(rename = "якудза")]
    Yakuza,
    #[serde(rename = "путана")]
    Courtesan,
    #[serde(rename = "вор")]
    Thief,
    #[serde(rename = "бомж")]
    Vagrant,
    #[serde(rename = "дед мороз")]
    FatherFrost,
    #[serde(rename = "самоубийца")]
    Suicide,
    #[serde(rename = "телохранитель")]
    Bodyguard,
    #[serde(rename = "снайпер")]
    Sniper,
    #[serde(rename = "журналист")]
    Journalist,
    #[serde(rename = "бессмертный")]
    Immortal,
    #[serde(rename = "оборотень")]
    Werewolf,
    #[serde(rename = "мирный")]
    Civilian,
}

/// Every role in catalog order.
pub const ALL_ROLES: [Role; 20] = [
    Role::Mafia,
    Role::Don,
    Role::Commissar,
    Role::Doctor,
    Role::Mistress,
    Role::Maniac,
    Role::Lawyer,
    Role::Sheriff,
    Role::Yakuza,
    Role::Courtesan,
    Role::Thief,
    Role::Vagrant,
    Role::FatherFrost,
    Role::Suicide,
    Role::Bodyguard,
    Role::Sniper,
    Role::Journalist,
    Role::Immortal,
    Role::Werewolf,
    Role::Civilian,
];

/// Roles dealt at most once per game: everything except мафия, дон and мирный.
pub const UNIQUE_ROLES: [Role; 17] = [
    Role::Commissar,
    Role::Doctor,
    Role::Mistress,
    Role::Maniac,
    Role::Lawyer,
    Role::Sheriff,
    Role::Yakuza,
    Role::Courtesan,
    Role::Thief,
    Role::Vagrant,
    Role::FatherFrost,
    Role::Suicide,
    Role::Bodyguard,
    Role::Sniper,
    Role::Journalist,
    Role::Immortal,
    Role::Werewolf,
];

/// Win-condition grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Faction {
    Mafia,
    Maniac,
    Werewolf,
    Peaceful,
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Faction::Mafia => "мафия",
            Faction::Maniac => "маньяк",
            Faction::Werewolf => "оборотень",
            Faction::Peaceful => "мирные",
        };
        f.write_str(name)
    }
}

/// A targeted night action. Each kind has a single slot per night.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    FactionKill,
    DonCheck,
    CommissarCheck,
    Heal,
    Block,
    ManiacKill,
    Guard,
    FrostProtect,
    SuicideKill,
    Visit,
    Steal,
    WerewolfKill,
    SniperShot,
}

impl ActionKind {
    /// Kills are the actions a block nullifies.
    pub const fn is_harmful(self) -> bool {
        matches!(
            self,
            ActionKind::FactionKill
                | ActionKind::ManiacKill
                | ActionKind::WerewolfKill
                | ActionKind::SuicideKill
                | ActionKind::SniperShot
        )
    }
}

impl Role {
    /// Catalog identifier.
    pub const fn name(self) -> &'static str {
        match self {
            Role::Mafia => "мафия",
            Role::Don => "дон",
            Role::Commissar => "комиссар",
            Role::Doctor => "доктор",
            Role::Mistress => "любовница",
            Role::Maniac => "маньяк",
            Role::Lawyer => "адвокат",
            Role::Sheriff => "шериф",
            Role::Yakuza => "якудза",
            Role::Courtesan => "путана",
            Role::Thief => "вор",
            Role::Vagrant => "бомж",
            Role::FatherFrost => "дед мороз",
            Role::Suicide => "самоубийца",
            Role::Bodyguard => "телохранитель",
            Role::Sniper => "снайпер",
            Role::Journalist => "журналист",
            Role::Immortal => "бессмертный",
            Role::Werewolf => "оборотень",
            Role::Civilian => "мирный",
        }
    }

    pub const fn faction(self) -> Faction {
        match self {
            Role::Mafia | Role::Don => Faction::Mafia,
            Role::Maniac => Faction::Maniac,
            Role::Werewolf => Faction::Werewolf,
            _ => Faction::Peaceful,
        }
    }

    pub const fn is_mafia_aligned(self) -> bool {
        matches!(self.faction(), Faction::Mafia)
    }

    /// Action kinds this role may submit at night. Empty for day-only and
    /// passive roles.
    pub const fn night_actions(self) -> &'static [ActionKind] {
        match self {
            Role::Mafia => &[ActionKind::FactionKill],
            Role::Don => &[ActionKind::FactionKill, ActionKind::DonCheck],
            Role::Commissar => &[ActionKind::CommissarCheck],
            Role::Doctor => &[ActionKind::Heal],
            Role::Mistress => &[ActionKind::Block],
            Role::Maniac => &[ActionKind::ManiacKill],
            Role::Bodyguard => &[ActionKind::Guard],
            Role::FatherFrost => &[ActionKind::FrostProtect],
            Role::Suicide => &[ActionKind::SuicideKill],
            Role::Courtesan => &[ActionKind::Visit],
            Role::Thief => &[ActionKind::Steal],
            Role::Werewolf => &[ActionKind::WerewolfKill],
            Role::Sniper => &[ActionKind::SniperShot],
            Role::Lawyer
            | Role::Sheriff
            | Role::Yakuza
            | Role::Vagrant
            | Role::Journalist
            | Role::Immortal
            | Role::Civilian => &[],
        }
    }

    pub fn is_night_role(self) -> bool {
        !self.night_actions().is_empty()
    }

    pub fn can_perform(self, kind: ActionKind) -> bool {
        self.night_actions().contains(&kind)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        ALL_ROLES
            .iter()
            .copied()
            .find(|role| role.name() == needle)
            .ok_or_else(|| {
                DomainError::validation(ValidationKind::UnknownRole, format!("unknown role: {s}"))
            })
    }
}

/// Roles that may act at night, in catalog order.
pub fn night_roles() -> impl Iterator<Item = Role> {
    ALL_ROLES.into_iter().filter(|role| role.is_night_role())
}

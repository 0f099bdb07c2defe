//! Win evaluation over the living roster.

use serde::{Deserialize, Serialize};

use crate::domain::roles::Faction;
use crate::domain::state::Roster;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionCounts {
    pub mafia: usize,
    pub maniac: usize,
    pub werewolf: usize,
    pub peaceful: usize,
}

impl FactionCounts {
    pub fn of(roster: &Roster) -> Self {
        let mut counts = Self::default();
        for player in roster.living() {
            match player.role.map(|r| r.faction()) {
                Some(Faction::Mafia) => counts.mafia += 1,
                Some(Faction::Maniac) => counts.maniac += 1,
                Some(Faction::Werewolf) => counts.werewolf += 1,
                Some(Faction::Peaceful) | None => counts.peaceful += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.mafia + self.maniac + self.werewolf + self.peaceful
    }
}

/// Result of a win check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "verdict", content = "faction")]
pub enum Verdict {
    /// More than one faction still alive.
    Undecided,
    /// Nobody left alive.
    NoOne,
    Winner(Faction),
}

impl Verdict {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Verdict::Undecided)
    }

    pub fn winner(self) -> Option<Faction> {
        match self {
            Verdict::Winner(faction) => Some(faction),
            _ => None,
        }
    }
}

/// Decide the game from the living players. Checks run in a fixed order:
/// nobody alive, peaceful, mafia, maniac, werewolf.
pub fn evaluate(roster: &Roster) -> Verdict {
    let c = FactionCounts::of(roster);
    if c.total() == 0 {
        return Verdict::NoOne;
    }
    if c.mafia == 0 && c.maniac == 0 && c.werewolf == 0 {
        return Verdict::Winner(Faction::Peaceful);
    }
    if c.peaceful == 0 && c.maniac == 0 && c.werewolf == 0 {
        return Verdict::Winner(Faction::Mafia);
    }
    if c.peaceful == 0 && c.mafia == 0 && c.werewolf == 0 {
        return Verdict::Winner(Faction::Maniac);
    }
    if c.peaceful == 0 && c.mafia == 0 && c.maniac == 0 {
        return Verdict::Winner(Faction::Werewolf);
    }
    Verdict::Undecided
}

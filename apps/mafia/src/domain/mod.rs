//! Domain layer: pure game logic with no I/O.

pub mod assignment;
pub mod day;
pub mod night;
pub mod roles;
pub mod rules;
pub mod seed_derivation;
pub mod session;
pub mod state;
pub mod victory;

#[cfg(test)]
mod test_gens;
#[cfg(test)]
mod test_prelude;
#[cfg(test)]
mod test_state_helpers;
#[cfg(test)]
mod tests_props_assignment;
#[cfg(test)]
mod tests_props_night;
#[cfg(test)]
mod tests_props_tally;
#[cfg(test)]
mod tests_props_victory;
#[cfg(test)]
mod tests_scenarios;

// Re-exports for ergonomics
pub use assignment::assign_roles;
pub use day::{tally_votes, Tally};
pub use night::{resolve_night, Finding, Investigation, NightResolution, Vengeance};
pub use roles::{ActionKind, Faction, Role};
pub use session::{PlayerSnapshot, RoundOutcome, Session, SessionSnapshot};
pub use state::{ChatId, NightAction, OneShotFlags, Phase, Player, PlayerId, Roster, Submission};
pub use victory::{evaluate, Verdict};

//! Error codes for the Mafia engine.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and are what transports report
//! back to players.

use core::fmt;

/// Centralized error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Registry
    /// A session already exists in this chat
    AlreadyExists,
    /// No session in this chat
    SessionNotFound,

    // Roster
    /// Player is already registered
    AlreadyJoined,
    /// Roster holds the maximum number of players
    RosterFull,
    /// Player is not in the roster
    NotInRoster,

    // Lifecycle
    /// Operation not allowed in the current phase
    WrongPhase,
    /// Only the creator may start the game
    NotCreator,
    /// Only the creator or an admin may stop the game
    NotAuthorized,
    /// Fewer players than the game needs
    InsufficientPlayers,

    // Submissions
    /// Actor does not hold the claimed role or ability
    NotYourRole,
    /// Actor is dead
    ActorDead,
    /// Voter is dead
    VoterDead,
    /// Target missing from roster or dead
    InvalidTarget,
    /// One-shot ability already spent
    AbilityExhausted,
    /// Submission after the collection window closed
    WindowClosed,
    /// Role name not in the catalog
    UnknownRole,

    /// General validation error
    ValidationError,
    ConfigError,
}

impl ErrorCode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AlreadyExists => "ALREADY_EXISTS",
            Self::SessionNotFound => "SESSION_NOT_FOUND",

            Self::AlreadyJoined => "ALREADY_JOINED",
            Self::RosterFull => "ROSTER_FULL",
            Self::NotInRoster => "NOT_IN_ROSTER",

            Self::WrongPhase => "WRONG_PHASE",
            Self::NotCreator => "NOT_CREATOR",
            Self::NotAuthorized => "NOT_AUTHORIZED",
            Self::InsufficientPlayers => "INSUFFICIENT_PLAYERS",

            Self::NotYourRole => "NOT_YOUR_ROLE",
            Self::ActorDead => "ACTOR_DEAD",
            Self::VoterDead => "VOTER_DEAD",
            Self::InvalidTarget => "INVALID_TARGET",
            Self::AbilityExhausted => "ABILITY_EXHAUSTED",
            Self::WindowClosed => "WINDOW_CLOSED",
            Self::UnknownRole => "UNKNOWN_ROLE",

            Self::ValidationError => "VALIDATION_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

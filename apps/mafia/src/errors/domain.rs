//! Domain-level rejection type returned by every core operation.
//!
//! Rejections are synchronous and never leave a session half-mutated: an
//! operation either applies completely or returns one of these.

use thiserror::Error;

use super::error_code::ErrorCode;

/// Business-rule violations.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    WrongPhase,
    RosterFull,
    InsufficientPlayers,
    NotCreator,
    NotAuthorized,
    NotYourRole,
    ActorDead,
    VoterDead,
    InvalidTarget,
    AbilityExhausted,
    UnknownRole,
    Other(String),
}

/// Semantic conflicts with existing state.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictKind {
    SessionExists,
    AlreadyJoined,
}

/// Missing entities in domain terms.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Session,
    Player,
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Input validation or business rule violation
    #[error("validation error {0:?}: {1}")]
    Validation(ValidationKind, String),
    /// Semantic conflict
    #[error("conflict {0:?}: {1}")]
    Conflict(ConflictKind, String),
    /// Missing resource
    #[error("not found {0:?}: {1}")]
    NotFound(NotFoundKind, String),
    /// Submission arrived after the collection window closed
    #[error("window closed: {0}")]
    WindowClosed(String),
}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }
    pub fn validation_other(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self::Validation(ValidationKind::Other(detail.clone()), detail)
    }
    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }
    pub fn window_closed(detail: impl Into<String>) -> Self {
        Self::WindowClosed(detail.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            DomainError::Validation(kind, _) => match kind {
                ValidationKind::WrongPhase => ErrorCode::WrongPhase,
                ValidationKind::RosterFull => ErrorCode::RosterFull,
                ValidationKind::InsufficientPlayers => ErrorCode::InsufficientPlayers,
                ValidationKind::NotCreator => ErrorCode::NotCreator,
                ValidationKind::NotAuthorized => ErrorCode::NotAuthorized,
                ValidationKind::NotYourRole => ErrorCode::NotYourRole,
                ValidationKind::ActorDead => ErrorCode::ActorDead,
                ValidationKind::VoterDead => ErrorCode::VoterDead,
                ValidationKind::InvalidTarget => ErrorCode::InvalidTarget,
                ValidationKind::AbilityExhausted => ErrorCode::AbilityExhausted,
                ValidationKind::UnknownRole => ErrorCode::UnknownRole,
                ValidationKind::Other(_) => ErrorCode::ValidationError,
            },
            DomainError::Conflict(kind, _) => match kind {
                ConflictKind::SessionExists => ErrorCode::AlreadyExists,
                ConflictKind::AlreadyJoined => ErrorCode::AlreadyJoined,
            },
            DomainError::NotFound(kind, _) => match kind {
                NotFoundKind::Session => ErrorCode::SessionNotFound,
                NotFoundKind::Player => ErrorCode::NotInRoster,
            },
            DomainError::WindowClosed(_) => ErrorCode::WindowClosed,
        }
    }

    /// Validation kind, if this is a validation error.
    pub fn validation_kind(&self) -> Option<&ValidationKind> {
        match self {
            DomainError::Validation(kind, _) => Some(kind),
            _ => None,
        }
    }
}

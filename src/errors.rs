//! Error handling for the election ledger

use crate::types::{CandidateId, ElectionPhase};

/// Result type alias for the election ledger
pub type Result<T> = std::result::Result<T, Error>;

/// Broad classification of an [`Error`], used by adapters to decide how to
/// report or retry a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Caller-correctable input problems; safe to fix and resubmit.
    Validation,
    /// A legitimate race or policy violation; reported, never retried.
    StateConflict,
    /// A reference to something that does not exist.
    NotFound,
    /// The backing store failed mid-operation; the only transient class.
    Storage,
}

/// Main error type for the election ledger
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    // --- validation ---
    /// The identity already has a registration (or belongs to a commissioner).
    #[error("identity already registered: {identity}")]
    AlreadyRegistered { identity: String },

    /// The credential store rejected the presented UVC.
    #[error("invalid voting credential: {reason}")]
    InvalidCredential { reason: String },

    /// A phase transition that is not an allowed forward step.
    #[error("invalid election phase transition: {from} -> {to}")]
    InvalidTransition {
        from: ElectionPhase,
        to: ElectionPhase,
    },

    /// A credential token was issued twice.
    #[error("credential code already issued: {code}")]
    DuplicateCredential { code: String },

    /// A constituency name was seeded twice.
    #[error("constituency name already exists: {name}")]
    DuplicateConstituency { name: String },

    // --- state conflicts ---
    /// The voter's ballot has already been recorded.
    #[error("voter has already cast a vote: {identity}")]
    AlreadyVoted { identity: String },

    /// The credential was consumed by an earlier registration.
    #[error("credential code has already been used")]
    CredentialAlreadyUsed,

    /// Votes are only accepted while the election is ongoing.
    #[error("election is not open for voting (current phase: {phase})")]
    ElectionNotOpen { phase: ElectionPhase },

    // --- not found ---
    /// No credential exists for the presented code.
    #[error("unknown credential code")]
    CredentialNotFound,

    /// No voter is registered under the identity.
    #[error("no registered voter for identity: {identity}")]
    VoterNotFound { identity: String },

    /// The candidate reference does not resolve.
    #[error("no such candidate: {id}")]
    CandidateNotFound { id: CandidateId },

    /// The constituency reference does not resolve.
    #[error("no such constituency: {name}")]
    ConstituencyNotFound { name: String },

    /// The party reference does not resolve.
    #[error("no such party: {name}")]
    PartyNotFound { name: String },

    /// The constituency exists but has no candidates to report.
    #[error("no results recorded for constituency: {name}")]
    NoData { name: String },

    // --- storage ---
    /// The backing store failed; the operation may be safely re-attempted.
    #[error("storage unavailable: {message}")]
    StorageUnavailable { message: String },

    // --- configuration ---
    /// Invalid or missing process configuration.
    #[error("configuration error: {message}")]
    Config { message: String },
}

impl Error {
    /// Create a new storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::StorageUnavailable {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new invalid-credential error
    pub fn invalid_credential(reason: impl Into<String>) -> Self {
        Self::InvalidCredential {
            reason: reason.into(),
        }
    }

    /// Classify this error per the ledger's error taxonomy.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::AlreadyRegistered { .. }
            | Self::InvalidCredential { .. }
            | Self::InvalidTransition { .. }
            | Self::DuplicateCredential { .. }
            | Self::DuplicateConstituency { .. }
            | Self::Config { .. } => ErrorClass::Validation,
            Self::AlreadyVoted { .. }
            | Self::CredentialAlreadyUsed
            | Self::ElectionNotOpen { .. } => ErrorClass::StateConflict,
            Self::CredentialNotFound
            | Self::VoterNotFound { .. }
            | Self::CandidateNotFound { .. }
            | Self::ConstituencyNotFound { .. }
            | Self::PartyNotFound { .. }
            | Self::NoData { .. } => ErrorClass::NotFound,
            Self::StorageUnavailable { .. } => ErrorClass::Storage,
        }
    }

    /// True only for failures an adapter may retry wholesale. Consume and
    /// cast are conditional updates, so a re-attempt after a confirmed
    /// failure cannot double-apply.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::StorageUnavailable { .. })
    }
}

/// Convenience macro for storage-failure errors
#[macro_export]
macro_rules! storage_error {
    ($msg:expr) => {
        $crate::Error::storage($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::Error::storage(format!($fmt, $($arg)*))
    };
}

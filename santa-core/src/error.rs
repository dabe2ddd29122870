//! Error types for santa-core

use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

/// Top-level error type for santa-core
#[derive(Error, Debug)]
pub enum SantaError {
    #[error("Assignment error: {0}")]
    Assignment(#[from] AssignmentError),

    #[error("Event error: {0}")]
    Event(#[from] EventError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Errors from the assignment engine
///
/// Whatever the variant, the participants handed to the engine are left
/// exactly as they were before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssignmentError {
    #[error("No valid assignment exists for {participants} participant(s); check family and previous-target constraints")]
    InfeasibleAssignment { participants: usize },

    #[error("Duplicate name found: {0}")]
    DuplicateDisplayName(String),

    #[error("Search budget exhausted after {steps} steps")]
    SearchBudgetExhausted { steps: u64 },
}

impl AssignmentError {
    /// Whether a retry with a different search order could succeed.
    ///
    /// Only budget exhaustion qualifies: infeasibility is a property of the
    /// constraint graph, not of the order it was searched in.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::SearchBudgetExhausted { .. })
    }
}

/// Errors from the event lifecycle
#[derive(Error, Debug)]
pub enum EventError {
    #[error("Event not found: {0}")]
    NotFound(Uuid),

    #[error("You must select a valid display name")]
    InvalidDisplayName,

    #[error("Participant name must not be blank")]
    BlankParticipantName,

    #[error("Duplicate name found: {0}")]
    DuplicateParticipant(String),

    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Event has already started")]
    AlreadyStarted,

    #[error("Event is not active")]
    NotActive,

    #[error("Participant not found: {0}")]
    ParticipantNotFound(String),

    #[error("Message must not be empty")]
    EmptyMessage,

    #[error("Assignment failed: {0}")]
    Assignment(#[from] AssignmentError),
}

/// Errors from event persistence
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Event not found: {0}")]
    NotFound(Uuid),
}

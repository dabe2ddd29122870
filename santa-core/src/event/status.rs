//! Event status state machine

use serde::{Deserialize, Serialize};

use crate::error::EventError;

/// Where an event is in its lifecycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    /// Roster can still be edited; no targets exist yet
    #[default]
    NotStarted,
    /// Targets are assigned and participants may look them up
    InProgress,
    /// Exchange is over
    Ended,
}

impl EventStatus {
    /// Check that moving to `next` is allowed.
    pub fn transition(self, next: EventStatus) -> Result<EventStatus, EventError> {
        match (self, next) {
            (Self::NotStarted, Self::InProgress) | (Self::InProgress, Self::Ended) => Ok(next),
            (Self::InProgress | Self::Ended, Self::InProgress) => Err(EventError::AlreadyStarted),
            _ => Err(EventError::InvalidStateTransition {
                from: self.to_string(),
                to: next.to_string(),
            }),
        }
    }

    pub fn has_started(self) -> bool {
        !matches!(self, Self::NotStarted)
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotStarted => write!(f, "not_started"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Ended => write!(f, "ended"),
        }
    }
}

//! santa-core: Core library for santa, the anonymous gift exchange organizer
//!
//! This crate provides:
//!
//! - **Assignment** - [`AssignmentEngine`] finds who gives to whom, with no
//!   self-gifts, no gifts within a family and no repeat of last round's pairing
//! - **Events** - [`GiftExchangeEvent`] and its `NotStarted -> InProgress -> Ended` lifecycle
//! - **Messages** - anonymous notes between a giver and their target
//! - **Registry** - [`EventRegistry`] for in-process, per-event locked access
//! - **Storage** - [`FileEventStore`] for JSON event documents
//!
//! # Quick Start
//!
//! ```
//! use santa_core::{AssignmentEngine, Participant, verify};
//!
//! let mut participants = vec![
//!     Participant::new("Alice").with_family("Smith"),
//!     Participant::new("Bob").with_family("Smith"),
//!     Participant::new("Carol"),
//!     Participant::new("Dave").with_previous_target("Carol"),
//! ];
//!
//! AssignmentEngine::with_seed(7).assign(&mut participants)?;
//! assert!(verify(&participants).is_ok());
//! # Ok::<(), santa_core::AssignmentError>(())
//! ```

pub mod assignment;
pub mod config;
pub mod error;
pub mod event;
pub mod participant;
pub mod store;

pub use assignment::{
    AssignmentEngine, AssignmentPlan, AssignmentViolation, SearchStats, assign, verify,
};
pub use config::EngineConfig;
pub use error::{AssignmentError, EventError, SantaError, StoreError};
pub use event::{
    EventRegistry, EventStatus, GiftExchangeEvent, Message, MessageKind, RosterChanges, ThreadEntry,
};
pub use participant::{Participant, RosterEntry};
pub use store::{EventStore, FileEventStore};

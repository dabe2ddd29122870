//! Constrained gift-exchange assignment
//!
//! Finds a derangement of the participants in which nobody gives to a
//! member of their own family or to the person they gave to last time.

mod engine;
mod matching;
mod search;
mod verify;

pub use engine::{AssignmentEngine, AssignmentPlan, SearchStats};
pub use verify::{AssignmentViolation, verify};

use crate::error::AssignmentError;
use crate::participant::Participant;

/// Assign targets to `participants` with the default engine configuration.
///
/// Succeeds without changes for an empty slice. On error, no participant's
/// target is modified.
pub fn assign(participants: &mut [Participant]) -> Result<(), AssignmentError> {
    AssignmentEngine::default().assign(participants).map(|_| ())
}

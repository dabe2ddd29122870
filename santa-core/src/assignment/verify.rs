//! Checks a committed assignment against the exchange rules.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::participant::Participant;

/// A way in which a set of participant targets breaks the exchange rules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssignmentViolation {
    #[error("{giver} has no target")]
    MissingTarget { giver: String },

    #[error("{giver} targets unknown participant {target}")]
    UnknownTarget { giver: String, target: String },

    #[error("{giver} is assigned to themself")]
    SelfAssignment { giver: String },

    #[error("{giver} is assigned to {target} again")]
    RepeatedPreviousTarget { giver: String, target: String },

    #[error("{giver} is assigned to {target} from the same family")]
    SameFamily { giver: String, target: String },

    #[error("{target} receives from more than one giver")]
    MultipleGivers { target: String },
}

/// Verify that every participant's target forms a valid exchange.
///
/// Checks that targets form a permutation of the participants with no fixed
/// points, and that no target breaks the family or previous-target rule.
pub fn verify(participants: &[Participant]) -> Result<(), AssignmentViolation> {
    let by_name: HashMap<&str, &Participant> = participants
        .iter()
        .map(|participant| (participant.display_name.as_str(), participant))
        .collect();
    let mut received: HashSet<&str> = HashSet::with_capacity(participants.len());

    for giver in participants {
        let target_name = giver
            .target
            .as_deref()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| AssignmentViolation::MissingTarget {
                giver: giver.display_name.clone(),
            })?;
        let target = by_name.get(target_name).ok_or_else(|| AssignmentViolation::UnknownTarget {
            giver: giver.display_name.clone(),
            target: target_name.to_string(),
        })?;

        if giver.display_name == target.display_name {
            return Err(AssignmentViolation::SelfAssignment {
                giver: giver.display_name.clone(),
            });
        }
        if giver.previous_target() == Some(target_name) {
            return Err(AssignmentViolation::RepeatedPreviousTarget {
                giver: giver.display_name.clone(),
                target: target_name.to_string(),
            });
        }
        if !giver.can_give_to(target) {
            return Err(AssignmentViolation::SameFamily {
                giver: giver.display_name.clone(),
                target: target_name.to_string(),
            });
        }
        if !received.insert(target_name) {
            return Err(AssignmentViolation::MultipleGivers {
                target: target_name.to_string(),
            });
        }
    }

    Ok(())
}

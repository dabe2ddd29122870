//! Roster editing for events that have not started yet.

use std::collections::{HashMap, HashSet};

use crate::error::EventError;
use crate::participant::{Participant, RosterEntry};

/// What a roster update changed, by display name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterChanges {
    pub added: Vec<String>,
    pub updated: Vec<String>,
    pub removed: Vec<String>,
}

impl RosterChanges {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }
}

/// Replace `current` with the participants named in `entries`.
///
/// Participants that stay on the roster keep their previous target and
/// ideas; only family and email are refreshed. Participants missing from
/// `entries` are dropped. The result follows the order of `entries`.
pub(crate) fn merge_roster(
    current: Vec<Participant>,
    entries: Vec<RosterEntry>,
) -> Result<(Vec<Participant>, RosterChanges), EventError> {
    let mut names = HashSet::with_capacity(entries.len());
    for entry in &entries {
        let name = entry.display_name.trim();
        if name.is_empty() {
            return Err(EventError::BlankParticipantName);
        }
        if !names.insert(name.to_string()) {
            return Err(EventError::DuplicateParticipant(name.to_string()));
        }
    }

    let mut existing: HashMap<String, Participant> = current
        .into_iter()
        .map(|participant| (participant.display_name.clone(), participant))
        .collect();
    let mut changes = RosterChanges::default();
    let mut roster = Vec::with_capacity(entries.len());

    for entry in entries {
        let name = entry.display_name.trim().to_string();
        match existing.remove(&name) {
            Some(mut participant) => {
                if participant.family != entry.family || participant.email != entry.email {
                    participant.family = entry.family;
                    participant.email = entry.email;
                    changes.updated.push(name);
                }
                roster.push(participant);
            }
            None => {
                changes.added.push(name.clone());
                roster.push(Participant::from(RosterEntry {
                    display_name: name,
                    ..entry
                }));
            }
        }
    }

    let mut removed: Vec<String> = existing.into_keys().collect();
    removed.sort();
    changes.removed = removed;

    Ok((roster, changes))
}

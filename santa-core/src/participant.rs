//! Participant records
//!
//! A participant is one member's instantiation within a single gift
//! exchange. The display name is the identity key for matching: targets and
//! previous targets refer to other participants by display name.

use serde::{Deserialize, Serialize};

/// A person taking part in one gift exchange event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Unique within an event
    pub display_name: String,
    /// Participants sharing a non-empty family never give to each other
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    /// Display name this participant gave to in the linked previous event
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_target: Option<String>,
    /// Display name this participant gives to; written by the assignment engine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Set once the participant has looked at their target
    #[serde(default)]
    pub is_target_known: bool,
    /// Contact address of the member behind this participant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Gift ideas the participant has shared
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub idea_list: Vec<String>,
}

impl Participant {
    /// Create a participant with no family, history or target
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            family: None,
            previous_target: None,
            target: None,
            is_target_known: false,
            email: None,
            idea_list: Vec::new(),
        }
    }

    /// Set the family label
    #[must_use]
    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = Some(family.into());
        self
    }

    /// Set the target from the previous event
    #[must_use]
    pub fn with_previous_target(mut self, previous_target: impl Into<String>) -> Self {
        self.previous_target = Some(previous_target.into());
        self
    }

    /// Set the contact email
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Family label, treating an empty string as no family
    pub fn family(&self) -> Option<&str> {
        self.family.as_deref().filter(|family| !family.is_empty())
    }

    /// Previous target, treating an empty string as none
    pub fn previous_target(&self) -> Option<&str> {
        self.previous_target.as_deref().filter(|name| !name.is_empty())
    }

    /// Whether this participant has been assigned someone to give to
    pub fn has_target(&self) -> bool {
        self.target.as_deref().is_some_and(|name| !name.is_empty())
    }

    /// Whether this participant may give to `other`.
    ///
    /// Rejects giving to yourself, to the person you gave to last time, and
    /// to anyone in your own (non-empty) family.
    pub fn can_give_to(&self, other: &Participant) -> bool {
        if self.display_name == other.display_name {
            return false;
        }
        if self.previous_target() == Some(other.display_name.as_str()) {
            return false;
        }
        if let Some(family) = self.family()
            && other.family.as_deref() == Some(family)
        {
            return false;
        }
        true
    }
}

/// Participant as entered on an event roster, before any assignment exists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub display_name: String,
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl From<RosterEntry> for Participant {
    fn from(entry: RosterEntry) -> Self {
        Self {
            family: entry.family,
            email: entry.email,
            ..Participant::new(entry.display_name)
        }
    }
}

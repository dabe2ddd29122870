//! Gift exchange events
//!
//! An event owns its participant roster and walks through
//! `NotStarted -> InProgress -> Ended`. Starting an event is the single point
//! where the assignment engine runs; if it fails the event stays editable
//! and every participant is left exactly as it was.

mod messages;
mod registry;
mod roster;
mod status;

pub use messages::{Message, MessageKind, ThreadEntry};
pub use registry::EventRegistry;
pub use roster::RosterChanges;
pub use status::EventStatus;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::assignment::{AssignmentEngine, SearchStats};
use crate::error::EventError;
use crate::participant::{Participant, RosterEntry};

/// Money limit used when an event doesn't set one
pub const DEFAULT_MONEY_LIMIT: &str = "$50";

/// Placeholder name shown in new-event forms; never a valid event name
pub const PLACEHOLDER_DISPLAY_NAME: &str = "<ENTER A NAME>";

/// One round of an anonymous gift exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GiftExchangeEvent {
    pub id: Uuid,
    pub display_name: String,
    pub money_limit: String,
    #[serde(default)]
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    /// Event this one was spawned from as a sequel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_event: Option<Uuid>,
    #[serde(default)]
    pub participants: Vec<Participant>,
    /// Anonymous giver/target messages, oldest first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<Message>,
}

impl GiftExchangeEvent {
    /// Create an empty, not-yet-started event.
    pub fn new(
        display_name: impl Into<String>,
        money_limit: Option<String>,
    ) -> Result<Self, EventError> {
        let display_name = validate_display_name(display_name.into())?;
        Ok(Self {
            id: Uuid::new_v4(),
            display_name,
            money_limit: money_limit
                .filter(|limit| !limit.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_MONEY_LIMIT.to_string()),
            status: EventStatus::NotStarted,
            created_at: Utc::now(),
            started_at: None,
            previous_event: None,
            participants: Vec::new(),
            messages: Vec::new(),
        })
    }

    /// Rename the event. Allowed in any state.
    pub fn rename(&mut self, display_name: impl Into<String>) -> Result<(), EventError> {
        self.display_name = validate_display_name(display_name.into())?;
        info!(event_id = %self.id, display_name = %self.display_name, "Event renamed");
        Ok(())
    }

    /// True only while the exchange is under way.
    pub fn is_active(&self) -> bool {
        self.status == EventStatus::InProgress
    }

    pub fn participant(&self, display_name: &str) -> Option<&Participant> {
        self.participants
            .iter()
            .find(|participant| participant.display_name == display_name)
    }

    /// Replace the roster. Only allowed before the event starts.
    pub fn update_roster(&mut self, entries: Vec<RosterEntry>) -> Result<RosterChanges, EventError> {
        if self.status.has_started() {
            return Err(EventError::AlreadyStarted);
        }
        let (roster, changes) = roster::merge_roster(self.participants.clone(), entries)?;
        self.participants = roster;
        Ok(changes)
    }

    /// Assign targets and move the event to `InProgress`.
    ///
    /// On any error the status and every participant are unchanged.
    pub fn start(&mut self, engine: &mut AssignmentEngine) -> Result<SearchStats, EventError> {
        let next = self.status.transition(EventStatus::InProgress)?;
        let stats = engine.assign(&mut self.participants)?;
        debug_assert!(crate::assignment::verify(&self.participants).is_ok());

        self.status = next;
        self.started_at = Some(Utc::now());
        info!(
            event_id = %self.id,
            participants = self.participants.len(),
            steps = stats.steps,
            "Event started"
        );
        Ok(stats)
    }

    /// Move the event to `Ended`.
    pub fn stop(&mut self) -> Result<(), EventError> {
        self.status = self.status.transition(EventStatus::Ended)?;
        info!(event_id = %self.id, "Event ended");
        Ok(())
    }

    /// Spawn the next round of this exchange.
    ///
    /// The sequel keeps the money limit and roster; each participant's
    /// current target becomes their previous target so it can't repeat.
    pub fn sequel(&self) -> GiftExchangeEvent {
        let participants = self
            .participants
            .iter()
            .map(|participant| Participant {
                family: participant.family.clone(),
                email: participant.email.clone(),
                previous_target: participant.target.clone(),
                ..Participant::new(participant.display_name.clone())
            })
            .collect();

        GiftExchangeEvent {
            id: Uuid::new_v4(),
            display_name: format!("Sequel to {}", self.display_name),
            money_limit: self.money_limit.clone(),
            status: EventStatus::NotStarted,
            created_at: Utc::now(),
            started_at: None,
            previous_event: Some(self.id),
            participants,
            messages: Vec::new(),
        }
    }

    /// Reveal a participant's target to them and remember that they looked.
    pub fn peek_target(&mut self, display_name: &str) -> Result<String, EventError> {
        if !self.is_active() {
            return Err(EventError::NotActive);
        }
        let participant = self
            .participants
            .iter_mut()
            .find(|participant| participant.display_name == display_name)
            .ok_or_else(|| EventError::ParticipantNotFound(display_name.to_string()))?;
        let target = participant
            .target
            .clone()
            .ok_or(EventError::NotActive)?;
        participant.is_target_known = true;
        Ok(target)
    }

    /// The participant giving to `display_name`.
    ///
    /// Hidden (`None`) until the giver has looked at their own target, unless
    /// `allow_unknown` is set.
    pub fn giver_of(
        &self,
        display_name: &str,
        allow_unknown: bool,
    ) -> Result<Option<&Participant>, EventError> {
        if self.participant(display_name).is_none() {
            return Err(EventError::ParticipantNotFound(display_name.to_string()));
        }
        let giver = self
            .participants
            .iter()
            .find(|participant| participant.target.as_deref() == Some(display_name));
        Ok(giver.filter(|giver| giver.is_target_known || allow_unknown))
    }

    /// Replace a participant's gift ideas. Blank ideas are dropped.
    pub fn update_ideas(
        &mut self,
        display_name: &str,
        ideas: Vec<String>,
    ) -> Result<(), EventError> {
        let participant = self
            .participants
            .iter_mut()
            .find(|participant| participant.display_name == display_name)
            .ok_or_else(|| EventError::ParticipantNotFound(display_name.to_string()))?;
        participant.idea_list = ideas
            .into_iter()
            .map(|idea| idea.trim().to_string())
            .filter(|idea| !idea.is_empty())
            .collect();
        Ok(())
    }

    /// Send a message from `sender` to the participant they give to.
    pub fn send_to_target(
        &mut self,
        sender: &str,
        content: impl Into<String>,
    ) -> Result<(), EventError> {
        if !self.is_active() {
            return Err(EventError::NotActive);
        }
        self.target_of(sender)?;
        self.post(sender, MessageKind::ToTarget, content.into())
    }

    /// Send a message from `sender` to whoever gives to them.
    pub fn send_to_giver(
        &mut self,
        sender: &str,
        content: impl Into<String>,
    ) -> Result<(), EventError> {
        if !self.is_active() {
            return Err(EventError::NotActive);
        }
        self.giver_of(sender, true)?.ok_or(EventError::NotActive)?;
        self.post(sender, MessageKind::ToGiver, content.into())
    }

    /// Conversation between `giver` and the participant they give to, newest first.
    pub fn thread_with_target(&self, giver: &str) -> Result<Vec<ThreadEntry>, EventError> {
        if !self.status.has_started() {
            return Err(EventError::NotActive);
        }
        let target = self.target_of(giver)?;
        Ok(messages::thread(&self.messages, giver, target))
    }

    /// Conversation between `target` and their giver, newest first.
    ///
    /// The entries carry no names, so the giver stays anonymous.
    pub fn thread_with_giver(&self, target: &str) -> Result<Vec<ThreadEntry>, EventError> {
        if !self.status.has_started() {
            return Err(EventError::NotActive);
        }
        let giver = self.giver_of(target, true)?.ok_or(EventError::NotActive)?;
        Ok(messages::thread(&self.messages, &giver.display_name, target))
    }

    fn target_of(&self, display_name: &str) -> Result<&str, EventError> {
        self.participant(display_name)
            .ok_or_else(|| EventError::ParticipantNotFound(display_name.to_string()))?
            .target
            .as_deref()
            .ok_or(EventError::NotActive)
    }

    fn post(
        &mut self,
        sender: &str,
        kind: MessageKind,
        content: String,
    ) -> Result<(), EventError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(EventError::EmptyMessage);
        }
        self.messages.push(Message {
            sender: sender.to_string(),
            kind,
            sent_at: Utc::now(),
            content: content.to_string(),
        });
        debug!(event_id = %self.id, ?kind, "Message sent");
        Ok(())
    }

    /// `(giver, target)` pairs in roster order, for an administrator's report.
    pub fn assignments(&self) -> Vec<(&str, &str)> {
        self.participants
            .iter()
            .filter_map(|participant| {
                participant
                    .target
                    .as_deref()
                    .map(|target| (participant.display_name.as_str(), target))
            })
            .collect()
    }
}

fn validate_display_name(display_name: String) -> Result<String, EventError> {
    let trimmed = display_name.trim();
    if trimmed.is_empty() || trimmed == PLACEHOLDER_DISPLAY_NAME {
        return Err(EventError::InvalidDisplayName);
    }
    Ok(trimmed.to_string())
}

//! Anonymous messages between a giver and their target
//!
//! Messages are kept on the event they belong to, so they go wherever the
//! event goes and vanish when it is deleted. The sender's name is stored for
//! bookkeeping but never leaves through [`ThreadEntry`]: a target only ever
//! learns that a message came from "your giver".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which side of a giver/target pair a message is addressed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// From a giver to the participant they give to
    ToTarget,
    /// From a target to their anonymous giver
    ToGiver,
}

/// One stored message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Display name of the participant who sent it
    pub sender: String,
    pub kind: MessageKind,
    pub sent_at: DateTime<Utc>,
    pub content: String,
}

/// A message as shown in a giver/target conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadEntry {
    pub kind: MessageKind,
    pub sent_at: DateTime<Utc>,
    pub content: String,
}

impl From<&Message> for ThreadEntry {
    fn from(message: &Message) -> Self {
        Self {
            kind: message.kind,
            sent_at: message.sent_at,
            content: message.content.clone(),
        }
    }
}

/// Messages exchanged between `giver` and `target`, newest first.
pub(crate) fn thread(messages: &[Message], giver: &str, target: &str) -> Vec<ThreadEntry> {
    let mut entries: Vec<ThreadEntry> = messages
        .iter()
        .rev()
        .filter(|message| match message.kind {
            MessageKind::ToTarget => message.sender == giver,
            MessageKind::ToGiver => message.sender == target,
        })
        .map(ThreadEntry::from)
        .collect();
    entries.sort_by(|a, b| b.sent_at.cmp(&a.sent_at));
    entries
}

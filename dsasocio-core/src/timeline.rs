//! Client-side view of one chat
//!
//! Sending is optimistic: the message shows up immediately as `Pending`,
//! then the server's row replaces it once the relay answers. Events from
//! the broker are merged by server id, so a message is never shown twice
//! even when the sender has the chat open in more than one tab.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::models::{ChatMessage, MessageText, NewMessageEvent, ValidationError};

/// Id given to a message before the server has assigned one
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocalId(String);

impl LocalId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryState {
    /// Sent, relay hasn't answered yet
    Pending(LocalId),
    /// Relay answered with a failure; kept so the user can see it
    Failed { local_id: LocalId, reason: String },
    /// Row exists on the server
    Confirmed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEntry {
    pub message: ChatMessage,
    pub sender_name: Option<String>,
    pub state: EntryState,
}

impl TimelineEntry {
    fn local_id(&self) -> Option<&LocalId> {
        match &self.state {
            EntryState::Pending(id) => Some(id),
            EntryState::Failed { local_id, .. } => Some(local_id),
            EntryState::Confirmed => None,
        }
    }

    fn server_id(&self) -> Option<&str> {
        matches!(self.state, EntryState::Confirmed).then_some(self.message.id.as_str())
    }
}

/// Ordered messages of one chat as seen by `me`
#[derive(Debug, Clone)]
pub struct ChatTimeline {
    chat_id: String,
    me: String,
    entries: Vec<TimelineEntry>,
    next_local: u64,
}

impl ChatTimeline {
    pub fn new(chat_id: impl Into<String>, me: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            me: me.into(),
            entries: Vec::new(),
            next_local: 0,
        }
    }

    /// Seed from history loaded from the server, oldest first.
    pub fn with_history(mut self, history: impl IntoIterator<Item = ChatMessage>) -> Self {
        for message in history {
            self.insert_confirmed(message, None);
        }
        self
    }

    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    /// Append an optimistic copy of an outgoing message.
    pub fn begin_send(&mut self, text: &str, now: DateTime<Utc>) -> Result<LocalId, ValidationError> {
        let text = MessageText::new(text)?;

        self.next_local += 1;
        let local_id = LocalId(format!("local-{}", self.next_local));

        self.entries.push(TimelineEntry {
            message: ChatMessage {
                id: local_id.0.clone(),
                chat_id: self.chat_id.clone(),
                sender_id: self.me.clone(),
                receiver_id: None,
                message: text.into_string(),
                created_at: now,
            },
            sender_name: None,
            state: EntryState::Pending(local_id.clone()),
        });

        Ok(local_id)
    }

    /// Replace a pending entry with the row the relay returned.
    ///
    /// Returns `false` when `local_id` is unknown.
    pub fn confirm(&mut self, local_id: &LocalId, row: ChatMessage) -> bool {
        let Some(pos) = self.position_of_local(local_id) else {
            return false;
        };

        let pending = self.entries.remove(pos);
        if self.contains_server_id(&row.id) {
            tracing::debug!(id = %row.id, "confirmed message already on timeline");
            return true;
        }

        self.insert_confirmed(row, pending.sender_name);
        true
    }

    /// Mark a pending entry as failed.
    pub fn fail(&mut self, local_id: &LocalId, reason: impl Into<String>) -> bool {
        let Some(pos) = self.position_of_local(local_id) else {
            return false;
        };
        self.entries[pos].state = EntryState::Failed {
            local_id: local_id.clone(),
            reason: reason.into(),
        };
        true
    }

    /// Merge a broadcast event. Returns whether the timeline changed.
    pub fn apply_broadcast(&mut self, event: NewMessageEvent) -> bool {
        if event.chat_id != self.chat_id {
            return false;
        }
        if self.contains_server_id(&event.id) {
            return false;
        }

        let sender_name = Some(event.sender_name.clone());
        self.insert_confirmed(event.into(), sender_name);
        true
    }

    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_mine(&self, entry: &TimelineEntry) -> bool {
        entry.message.sender_id == self.me
    }

    /// Latest confirmed message, for partner list previews.
    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.state == EntryState::Confirmed)
            .map(|e| &e.message)
    }

    fn position_of_local(&self, local_id: &LocalId) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.local_id() == Some(local_id))
    }

    fn contains_server_id(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.server_id() == Some(id))
    }

    /// Insert ordered by `created_at` among confirmed entries, after any
    /// equal timestamps. Confirmed entries always form a prefix; pending and
    /// failed entries follow in send order.
    fn insert_confirmed(&mut self, message: ChatMessage, sender_name: Option<String>) {
        let pos = self
            .entries
            .iter()
            .position(|e| {
                e.state != EntryState::Confirmed || e.message.created_at > message.created_at
            })
            .unwrap_or(self.entries.len());

        self.entries.insert(
            pos,
            TimelineEntry {
                message,
                sender_name,
                state: EntryState::Confirmed,
            },
        );
    }
}

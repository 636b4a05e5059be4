//! Chat messages and the event broadcast when one is sent

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{bounded, non_blank};
use super::ValidationError;

/// Name shown to the receiver when the sender didn't supply one
pub const DEFAULT_SENDER_NAME: &str = "Someone";

/// Maximum message length in characters.
///
/// Multibyte text can still exceed the broker's payload cap; the relay
/// checks the encoded event size separately.
const MAX_MESSAGE_LEN: usize = 4000;

/// Validated, trimmed message text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageText(String);

impl MessageText {
    /// Trim and validate message text.
    ///
    /// # Example
    /// ```
    /// use dsasocio_core::models::MessageText;
    ///
    /// assert_eq!(MessageText::new("  hi ").unwrap().as_str(), "hi");
    /// assert!(MessageText::new("   ").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let text = non_blank("message", s)?;
        bounded("message", &text, MAX_MESSAGE_LEN)?;
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for MessageText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Row from `messages`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub chat_id: String,
    pub sender_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver_id: Option<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Payload of the `new-message` event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessageEvent {
    pub id: String,
    pub chat_id: String,
    pub sender_id: String,
    pub sender_name: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl NewMessageEvent {
    /// Event name used on the chat channel
    pub const NAME: &'static str = "new-message";

    pub fn from_message(message: &ChatMessage, sender_name: Option<&str>) -> Self {
        let sender_name = sender_name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_SENDER_NAME);

        Self {
            id: message.id.clone(),
            chat_id: message.chat_id.clone(),
            sender_id: message.sender_id.clone(),
            sender_name: sender_name.to_owned(),
            message: message.message.clone(),
            created_at: message.created_at,
        }
    }
}

impl From<NewMessageEvent> for ChatMessage {
    fn from(event: NewMessageEvent) -> Self {
        Self {
            id: event.id,
            chat_id: event.chat_id,
            sender_id: event.sender_id,
            receiver_id: None,
            message: event.message,
            created_at: event.created_at,
        }
    }
}

//! Chat ids, broker channel names and connection ids
//!
//! A chat between two users lives on one private channel. The channel name
//! is derived from the chat id, which is derived from the pair of user ids,
//! so both sides compute the same name without asking the server.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::ValidationError;

/// Characters the broker accepts in a channel name
static CHANNEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-a-zA-Z0-9_=@,.;]+$").expect("invalid channel regex"));

static SOCKET_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\d+$").expect("invalid socket id regex"));

const MAX_CHANNEL_LEN: usize = 200;

/// Separator between the two user ids of a pair chat
const PAIR_SEPARATOR: char = '_';

/// Prefix for per-chat channels
const CHAT_CHANNEL_PREFIX: &str = "private-chat-";

/// Identifier of a one-to-one conversation
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(String);

impl ChatId {
    /// Canonical chat id for two users. Order of arguments does not matter.
    ///
    /// # Example
    /// ```
    /// use dsasocio_core::ChatId;
    ///
    /// assert_eq!(ChatId::for_pair("bob", "alice"), ChatId::for_pair("alice", "bob"));
    /// assert_eq!(ChatId::for_pair("bob", "alice").as_str(), "alice_bob");
    /// ```
    pub fn for_pair(a: &str, b: &str) -> Self {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        Self(format!("{lo}{PAIR_SEPARATOR}{hi}"))
    }

    /// Wrap an existing chat id as stored in the database.
    pub fn new(id: &str) -> Result<Self, ValidationError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(ValidationError::Empty { field: "chat_id" });
        }
        Ok(Self(id.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split a pair id back into its two user ids.
    ///
    /// Returns `None` for ids that were not built by [`ChatId::for_pair`].
    /// User ids are UUIDs, so they never contain the separator themselves.
    pub fn participants(&self) -> Option<(&str, &str)> {
        let (a, b) = self.0.split_once(PAIR_SEPARATOR)?;
        if a.is_empty() || b.is_empty() || b.contains(PAIR_SEPARATOR) {
            return None;
        }
        Some((a, b))
    }

    /// The other participant of a pair chat.
    pub fn counterpart(&self, user: &str) -> Option<&str> {
        match self.participants()? {
            (a, b) if a == user => Some(b),
            (a, b) if b == user => Some(a),
            _ => None,
        }
    }

    /// Private broker channel carrying this chat.
    pub fn channel(&self) -> ChannelName {
        ChannelName(chat_channel(self.as_str()))
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Channel name for a chat id: `private-chat-{chat_id}`.
pub fn chat_channel(chat_id: &str) -> String {
    format!("{CHAT_CHANNEL_PREFIX}{chat_id}")
}

/// Channel visibility, decided by name prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    Public,
    Private,
    PrivateEncrypted,
    Presence,
}

impl ChannelKind {
    /// Whether subscribing requires a signed auth token.
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Self::Public)
    }
}

/// Validated broker channel name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChannelName(String);

impl ChannelName {
    pub fn parse(name: &str) -> Result<Self, ValidationError> {
        if name.is_empty() {
            return Err(ValidationError::Empty { field: "channel" });
        }
        if name.len() > MAX_CHANNEL_LEN {
            return Err(ValidationError::TooLong {
                field: "channel",
                max: MAX_CHANNEL_LEN,
            });
        }
        if !CHANNEL_RE.is_match(name) {
            return Err(ValidationError::InvalidFormat {
                field: "channel",
                reason: "only letters, digits and -_=@,.; are allowed",
            });
        }
        Ok(Self(name.to_owned()))
    }

    pub fn kind(&self) -> ChannelKind {
        if self.0.starts_with("private-encrypted-") {
            ChannelKind::PrivateEncrypted
        } else if self.0.starts_with("private-") {
            ChannelKind::Private
        } else if self.0.starts_with("presence-") {
            ChannelKind::Presence
        } else {
            ChannelKind::Public
        }
    }

    /// Chat id carried by a `private-chat-*` channel.
    pub fn chat_id(&self) -> Option<&str> {
        self.0
            .strip_prefix(CHAT_CHANNEL_PREFIX)
            .filter(|id| !id.is_empty())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ChannelName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ChannelName> for String {
    fn from(value: ChannelName) -> Self {
        value.0
    }
}

impl fmt::Display for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque id the broker assigns to one client connection.
///
/// Passing the sender's socket id on trigger keeps the event from echoing
/// back to the tab that sent it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SocketId(String);

impl SocketId {
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: "socket_id" });
        }
        if !SOCKET_ID_RE.is_match(value) {
            return Err(ValidationError::InvalidFormat {
                field: "socket_id",
                reason: "expected digits.digits",
            });
        }
        Ok(Self(value.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SocketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn pair_chat_round_trip() {
        let id = ChatId::for_pair("u-2", "u-1");
        assert_eq!(id.as_str(), "u-1_u-2");
        assert_eq!(id.participants(), Some(("u-1", "u-2")));
        assert_eq!(id.counterpart("u-1"), Some("u-2"));
        assert_eq!(id.counterpart("u-2"), Some("u-1"));
        assert_eq!(id.counterpart("u-3"), None);
    }

    #[test]
    fn opaque_chat_ids_have_no_participants() {
        let id = ChatId::new("c0ffee").unwrap();
        assert_eq!(id.participants(), None);
        assert_eq!(id.counterpart("c0ffee"), None);
        assert!(ChatId::new("  ").is_err());
    }

    #[test]
    fn chat_channel_name() {
        let id = ChatId::for_pair("a", "b");
        let channel = id.channel();
        assert_eq!(channel.as_str(), "private-chat-a_b");
        assert_eq!(channel.kind(), ChannelKind::Private);
        assert_eq!(channel.chat_id(), Some("a_b"));
    }

    #[test]
    fn channel_kinds() {
        let kind = |s: &str| ChannelName::parse(s).unwrap().kind();
        assert_eq!(kind("health-test"), ChannelKind::Public);
        assert_eq!(kind("private-chat-1"), ChannelKind::Private);
        assert_eq!(kind("private-encrypted-x"), ChannelKind::PrivateEncrypted);
        assert_eq!(kind("presence-room"), ChannelKind::Presence);
        assert!(!ChannelKind::Public.requires_auth());
        assert!(ChannelKind::Presence.requires_auth());
    }

    #[test]
    fn channel_validation() {
        assert!(ChannelName::parse("").is_err());
        assert!(ChannelName::parse("has space").is_err());
        assert!(ChannelName::parse("private-chat/1").is_err());
        assert!(ChannelName::parse(&"a".repeat(201)).is_err());
        assert!(ChannelName::parse(&"a".repeat(200)).is_ok());
    }

    #[test]
    fn channel_deserialize_validates() {
        assert!(serde_json::from_str::<ChannelName>("\"private-ok\"").is_ok());
        assert!(serde_json::from_str::<ChannelName>("\"not ok\"").is_err());
    }

    #[test]
    fn socket_ids() {
        assert_eq!(SocketId::parse("123.456").unwrap().as_str(), "123.456");
        assert!(SocketId::parse("123").is_err());
        assert!(SocketId::parse("abc.def").is_err());
        assert!(SocketId::parse("").is_err());
    }

    proptest! {
        #[test]
        fn pair_ids_are_symmetric(a in "[a-f0-9-]{1,36}", b in "[a-f0-9-]{1,36}") {
            let ab = ChatId::for_pair(&a, &b);
            prop_assert_eq!(&ab, &ChatId::for_pair(&b, &a));
            prop_assert_eq!(ab.counterpart(&a), Some(b.as_str()));
            prop_assert!(ChannelName::parse(ab.channel().as_str()).is_ok());
        }
    }
}

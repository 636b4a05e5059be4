//! Chat message endpoints
//!
//! `send` persists first and broadcasts second. If the broadcast fails the
//! row stays stored and the caller gets a 500; there is no retry.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::{routing::{get, post}, Json, Router};
use chrono::Utc;
use serde::Deserialize;

use dsasocio_core::models::MessageText;
use dsasocio_core::{ChannelName, ChatId, ChatMessage, NewMessageEvent, SocketId, ValidationError};

use crate::broker::MAX_EVENT_BYTES;
use crate::error::ApiError;
use crate::extractors::Payload;
use crate::pagination::{PageParams, Paginated, Pagination};
use crate::state::AppState;
use crate::store::NewChatMessage;

/// Header carrying the sender's broker connection id
pub const SOCKET_ID_HEADER: &str = "x-pusher-socket-id";

/// Longest row id the store hands back (UUID text form)
const MAX_ROW_ID_LEN: usize = 36;

/// Send message request. Everything is optional at the serde level so a
/// missing field yields "Missing data" rather than a parse error.
#[derive(Debug, Default, Deserialize)]
pub struct SendMessageRequest {
    pub chat_id: Option<String>,
    pub sender_id: Option<String>,
    pub message: Option<String>,
    pub channel: Option<String>,
    pub receiver_id: Option<String>,
    pub sender_name: Option<String>,
}

/// Validated send
#[derive(Debug)]
struct Outgoing {
    message: NewChatMessage,
    channel: ChannelName,
    sender_name: Option<String>,
}

fn required(value: &Option<String>) -> Result<&str, ApiError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(ApiError::MissingData)
}

impl SendMessageRequest {
    fn validate(self) -> Result<Outgoing, ApiError> {
        let chat_id = required(&self.chat_id)?;
        let sender_id = required(&self.sender_id)?;
        let text = required(&self.message)?;
        let channel = required(&self.channel)?;

        let chat = ChatId::new(chat_id)?;
        let channel = ChannelName::parse(channel)?;
        let message = MessageText::new(text)?;

        // Pair chats name both users, so the receiver can be filled in.
        let receiver_id = self
            .receiver_id
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .or_else(|| chat.counterpart(sender_id))
            .map(str::to_owned);

        let outgoing = Outgoing {
            message: NewChatMessage {
                chat_id: chat.as_str().to_owned(),
                sender_id: sender_id.to_owned(),
                receiver_id,
                message,
            },
            channel,
            sender_name: self.sender_name,
        };
        outgoing.check_event_size()?;
        Ok(outgoing)
    }
}

impl Outgoing {
    /// Reject sends whose `new-message` event would exceed the broker's
    /// payload cap. Runs before the insert so nothing is stored unsent.
    fn check_event_size(&self) -> Result<(), ApiError> {
        let widest = ChatMessage {
            id: "0".repeat(MAX_ROW_ID_LEN),
            chat_id: self.message.chat_id.clone(),
            sender_id: self.message.sender_id.clone(),
            receiver_id: None,
            message: self.message.message.as_str().to_owned(),
            created_at: Utc::now(),
        };
        let event = NewMessageEvent::from_message(&widest, self.sender_name.as_deref());
        let size = serde_json::to_vec(&event)
            .map_err(|e| ApiError::internal(e.to_string()))?
            .len();

        if size > MAX_EVENT_BYTES {
            return Err(ValidationError::InvalidFormat {
                field: "message",
                reason: "too large to broadcast",
            }
            .into());
        }
        Ok(())
    }
}

fn socket_id(headers: &HeaderMap) -> Result<Option<SocketId>, ApiError> {
    match headers.get(SOCKET_ID_HEADER) {
        None => Ok(None),
        Some(value) => {
            let raw = value
                .to_str()
                .map_err(|_| ApiError::BadRequest("socket id is not valid text".into()))?;
            Ok(Some(SocketId::parse(raw)?))
        }
    }
}

/// Row used when no store is configured
fn unsaved(message: NewChatMessage) -> ChatMessage {
    let now = Utc::now();
    ChatMessage {
        id: now.timestamp_millis().to_string(),
        chat_id: message.chat_id,
        sender_id: message.sender_id,
        receiver_id: message.receiver_id,
        message: message.message.into_string(),
        created_at: now,
    }
}

/// POST /api/messages/send - persist then broadcast, excluding the sender
async fn send_message(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Payload(req): Payload<SendMessageRequest>,
) -> Result<Json<ChatMessage>, ApiError> {
    let exclude = socket_id(&headers)?;
    let outgoing = req.validate()?;

    let row = match &state.store {
        Some(store) => {
            let row = store.insert(outgoing.message).await?;
            tracing::debug!(id = %row.id, chat = %row.chat_id, "message stored");
            row
        }
        None => {
            tracing::debug!("no store configured, relaying without persistence");
            unsaved(outgoing.message)
        }
    };

    let event = NewMessageEvent::from_message(&row, outgoing.sender_name.as_deref());
    let data = serde_json::to_value(&event).map_err(|e| ApiError::internal(e.to_string()))?;
    state
        .broker
        .trigger(&outgoing.channel, NewMessageEvent::NAME, &data, exclude.as_ref())
        .await?;

    tracing::info!(channel = %outgoing.channel, id = %row.id, "message relayed");
    Ok(Json(row))
}

/// GET /api/messages/{chat_id} - stored history, oldest first
async fn list_messages(
    State(state): State<Arc<AppState>>,
    Path(chat_id): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Json<Paginated<ChatMessage>>, ApiError> {
    let store = state.store.as_ref().ok_or(ApiError::Unavailable {
        what: "message store",
    })?;
    let chat = ChatId::new(&chat_id)?;

    let page = store
        .list_for_chat(chat.as_str(), Pagination::from(params))
        .await?;
    Ok(Json(page))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/messages/send", post(send_message))
        .route("/api/messages/{chat_id}", get(list_messages))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(chat: &str, sender: &str, message: &str, channel: &str) -> SendMessageRequest {
        SendMessageRequest {
            chat_id: Some(chat.into()),
            sender_id: Some(sender.into()),
            message: Some(message.into()),
            channel: Some(channel.into()),
            ..Default::default()
        }
    }

    #[test]
    fn blank_fields_are_missing() {
        let err = request("a_b", "a", "   ", "private-chat-a_b").validate().unwrap_err();
        assert!(matches!(err, ApiError::MissingData));

        let err = SendMessageRequest::default().validate().unwrap_err();
        assert!(matches!(err, ApiError::MissingData));
    }

    #[test]
    fn receiver_is_derived_from_pair_chat() {
        let out = request("alice_bob", "bob", " hi ", "private-chat-alice_bob")
            .validate()
            .unwrap();
        assert_eq!(out.message.receiver_id.as_deref(), Some("alice"));
        assert_eq!(out.message.message.as_str(), "hi");
    }

    #[test]
    fn explicit_receiver_wins() {
        let mut req = request("room-1", "bob", "hi", "private-chat-room-1");
        req.receiver_id = Some("carol".into());
        let out = req.validate().unwrap();
        assert_eq!(out.message.receiver_id.as_deref(), Some("carol"));
    }

    #[test]
    fn bad_channel_is_validation_error() {
        let err = request("a_b", "a", "hi", "no spaces allowed").validate().unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn multibyte_text_over_broadcast_cap_is_rejected() {
        let ascii = "a".repeat(4000);
        assert!(request("a_b", "a", &ascii, "private-chat-a_b").validate().is_ok());

        // 4000 chars passes the length check but is ~12 KB encoded.
        let cjk = "中".repeat(4000);
        let err = request("a_b", "a", &cjk, "private-chat-a_b").validate().unwrap_err();
        assert!(matches!(
            err,
            ApiError::Validation(ValidationError::InvalidFormat { field: "message", .. })
        ));
    }

    #[test]
    fn socket_header_parsing() {
        let mut headers = HeaderMap::new();
        assert!(socket_id(&headers).unwrap().is_none());

        headers.insert(SOCKET_ID_HEADER, "123.456".parse().unwrap());
        assert_eq!(socket_id(&headers).unwrap().unwrap().as_str(), "123.456");

        headers.insert(SOCKET_ID_HEADER, "undefined".parse().unwrap());
        assert!(socket_id(&headers).is_err());
    }

    #[test]
    fn unsaved_rows_get_a_timestamp_id() {
        let row = unsaved(NewChatMessage {
            chat_id: "a_b".into(),
            sender_id: "a".into(),
            receiver_id: Some("b".into()),
            message: MessageText::new("hi").unwrap(),
        });
        assert!(row.id.parse::<i64>().is_ok());
        assert_eq!(row.message, "hi");
    }
}

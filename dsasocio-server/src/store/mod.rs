//! Message persistence
//!
//! The store is optional. Without one the relay still broadcasts, using a
//! synthetic id, and history queries answer 503.

mod postgres;

use async_trait::async_trait;

use dsasocio_core::models::MessageText;
use dsasocio_core::ChatMessage;

use crate::pagination::{Paginated, Pagination};

pub use postgres::{create_pool, PgMessageStore};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

/// Validated insert for `messages`
#[derive(Debug, Clone)]
pub struct NewChatMessage {
    pub chat_id: String,
    pub sender_id: String,
    pub receiver_id: Option<String>,
    pub message: MessageText,
}

#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Insert a row and return it as stored (id and timestamp assigned).
    async fn insert(&self, message: NewChatMessage) -> Result<ChatMessage, StoreError>;

    /// Messages of one chat, oldest first.
    async fn list_for_chat(
        &self,
        chat_id: &str,
        page: Pagination,
    ) -> Result<Paginated<ChatMessage>, StoreError>;

    /// Cheap connectivity check for `/health`.
    async fn ping(&self) -> bool;
}

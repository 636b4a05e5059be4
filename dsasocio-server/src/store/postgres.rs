//! Postgres-backed message store
//!
//! Expects a `messages` table with text participant columns; `migrate`
//! creates it when missing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool, Row};

use dsasocio_core::ChatMessage;

use super::{MessageStore, NewChatMessage, StoreError};
use crate::pagination::{Paginated, Pagination};

/// The relay does one insert per request; a handful of connections is plenty.
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(DEFAULT_MAX_CONNECTIONS)
        .connect(database_url)
        .await
}

const CREATE_MESSAGES: &str = r#"
CREATE TABLE IF NOT EXISTS messages (
    id          UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    chat_id     TEXT NOT NULL,
    sender_id   TEXT NOT NULL,
    receiver_id TEXT,
    message     TEXT NOT NULL,
    created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#;

const CREATE_CHAT_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS messages_chat_created_idx ON messages (chat_id, created_at)";

#[derive(Debug, FromRow)]
struct MessageRow {
    id: String,
    chat_id: String,
    sender_id: String,
    receiver_id: Option<String>,
    message: String,
    created_at: DateTime<Utc>,
}

impl From<MessageRow> for ChatMessage {
    fn from(r: MessageRow) -> Self {
        Self {
            id: r.id,
            chat_id: r.chat_id,
            sender_id: r.sender_id,
            receiver_id: r.receiver_id,
            message: r.message,
            created_at: r.created_at,
        }
    }
}

#[derive(Clone)]
pub struct PgMessageStore {
    pool: PgPool,
}

impl PgMessageStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `messages` table and its index if they don't exist.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_MESSAGES).execute(&self.pool).await?;
        sqlx::query(CREATE_CHAT_INDEX).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl MessageStore for PgMessageStore {
    async fn insert(&self, message: NewChatMessage) -> Result<ChatMessage, StoreError> {
        let row: MessageRow = sqlx::query_as(
            r#"
            INSERT INTO messages (chat_id, sender_id, receiver_id, message)
            VALUES ($1, $2, $3, $4)
            RETURNING id::text AS id, chat_id, sender_id, receiver_id, message, created_at
            "#,
        )
        .bind(&message.chat_id)
        .bind(&message.sender_id)
        .bind(message.receiver_id.as_deref())
        .bind(message.message.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn list_for_chat(
        &self,
        chat_id: &str,
        page: Pagination,
    ) -> Result<Paginated<ChatMessage>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT
                id::text AS id,
                chat_id,
                sender_id,
                receiver_id,
                message,
                created_at,
                COUNT(*) OVER() AS total
            FROM messages
            WHERE chat_id = $1
            ORDER BY created_at ASC, id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(chat_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = match rows.first() {
            Some(row) => row.try_get("total")?,
            None => 0,
        };

        let items = rows
            .iter()
            .map(|row| MessageRow::from_row(row).map(ChatMessage::from))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Paginated {
            items,
            total,
            page: page.page,
            per_page: page.per_page,
        })
    }

    async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsasocio_core::models::MessageText;

    // Integration tests require a real database
    // Run with: DATABASE_URL=postgres://... cargo test -p dsasocio-server

    async fn store() -> PgMessageStore {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = create_pool(&url).await.expect("pool creation failed");
        let store = PgMessageStore::new(pool);
        store.migrate().await.expect("migration failed");
        store
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn insert_returns_stored_row() {
        let store = store().await;
        let chat_id = format!("test-{}", Utc::now().timestamp_nanos_opt().unwrap_or_default());

        let row = store
            .insert(NewChatMessage {
                chat_id: chat_id.clone(),
                sender_id: "alice".into(),
                receiver_id: Some("bob".into()),
                message: MessageText::new("  hello  ").unwrap(),
            })
            .await
            .expect("insert failed");

        assert_eq!(row.chat_id, chat_id);
        assert_eq!(row.message, "hello");
        assert_eq!(row.receiver_id.as_deref(), Some("bob"));
        assert!(!row.id.is_empty());
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn history_is_oldest_first() {
        let store = store().await;
        let chat_id = format!("hist-{}", Utc::now().timestamp_nanos_opt().unwrap_or_default());

        for text in ["one", "two", "three"] {
            store
                .insert(NewChatMessage {
                    chat_id: chat_id.clone(),
                    sender_id: "alice".into(),
                    receiver_id: None,
                    message: MessageText::new(text).unwrap(),
                })
                .await
                .expect("insert failed");
        }

        let page = store
            .list_for_chat(&chat_id, Pagination::new(1, 2))
            .await
            .expect("list failed");
        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].message, "one");
    }
}

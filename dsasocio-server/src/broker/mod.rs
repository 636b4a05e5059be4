//! Pub/sub broker: event triggering and channel auth
//!
//! The relay only ever publishes; clients subscribe to the broker directly
//! and come back to `/api/pusher/auth` for a signed token.

mod pusher;
mod signature;

use async_trait::async_trait;
use serde_json::Value;

use dsasocio_core::{ChannelName, SocketId};

pub use pusher::PusherClient;
pub use signature::{body_md5, hmac_sha256_hex, signed_query, AuthError, ChannelAuth, ChannelAuthorizer};

/// Largest event payload the broker accepts
pub const MAX_EVENT_BYTES: usize = 10 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum BrokerError {
    #[error("broker request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("broker rejected trigger ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("event payload is {size} bytes, limit is {max}")]
    PayloadTooLarge { size: usize, max: usize },

    #[error("could not encode event: {0}")]
    Json(#[from] serde_json::Error),
}

/// Something that can publish an event to a channel.
#[async_trait]
pub trait Broadcaster: Send + Sync {
    /// Publish `event` with `data` on `channel`. Subscribers on the
    /// connection `exclude` do not receive it.
    async fn trigger(
        &self,
        channel: &ChannelName,
        event: &str,
        data: &Value,
        exclude: Option<&SocketId>,
    ) -> Result<(), BrokerError>;

    /// Short name for logs and health output.
    fn name(&self) -> &'static str;
}

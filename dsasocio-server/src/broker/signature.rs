//! Request and channel signing for the broker's HTTP API
//!
//! Both use hex HMAC-SHA256 with the app secret. REST calls sign
//! `METHOD\nPATH\nSORTED_QUERY`; channel auth signs
//! `socket_id:channel_name[:channel_data]`.

use hmac::{Hmac, Mac};
use serde::Serialize;
use serde_json::json;
use sha2::Sha256;

use dsasocio_core::{ChannelKind, ChannelName, SocketId};

type HmacSha256 = Hmac<Sha256>;

const AUTH_VERSION: &str = "1.0";

pub fn hmac_sha256_hex(secret: &str, message: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any size");
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

pub fn body_md5(body: &[u8]) -> String {
    format!("{:x}", md5::compute(body))
}

/// Query string for a signed REST call, `auth_signature` last.
pub fn signed_query(
    key: &str,
    secret: &str,
    method: &str,
    path: &str,
    body: &[u8],
    timestamp: i64,
) -> String {
    // Keys are already in lexical order.
    let query = format!(
        "auth_key={}&auth_timestamp={}&auth_version={}&body_md5={}",
        key,
        timestamp,
        AUTH_VERSION,
        body_md5(body)
    );
    let to_sign = format!("{}\n{}\n{}", method, path, query);
    format!("{}&auth_signature={}", query, hmac_sha256_hex(secret, &to_sign))
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("channel '{0}' is public and needs no authentication")]
    PublicChannel(String),

    #[error("encrypted channels are not supported")]
    EncryptedUnsupported,
}

/// Body returned to the client SDK
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelAuth {
    pub auth: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_data: Option<String>,
}

/// Signs private and presence channel subscriptions
#[derive(Clone)]
pub struct ChannelAuthorizer {
    key: String,
    secret: String,
}

impl ChannelAuthorizer {
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Sign a subscription of `socket_id` to `channel` for `user_id`.
    ///
    /// Presence channels also carry `channel_data` naming the user.
    pub fn authorize(
        &self,
        socket_id: &SocketId,
        channel: &ChannelName,
        user_id: &str,
    ) -> Result<ChannelAuth, AuthError> {
        let channel_data = match channel.kind() {
            ChannelKind::Public => return Err(AuthError::PublicChannel(channel.to_string())),
            ChannelKind::PrivateEncrypted => return Err(AuthError::EncryptedUnsupported),
            ChannelKind::Private => None,
            ChannelKind::Presence => Some(json!({ "user_id": user_id }).to_string()),
        };

        let mut to_sign = format!("{}:{}", socket_id, channel);
        if let Some(data) = &channel_data {
            to_sign.push(':');
            to_sign.push_str(data);
        }

        Ok(ChannelAuth {
            auth: format!("{}:{}", self.key, hmac_sha256_hex(&self.secret, &to_sign)),
            channel_data,
        })
    }
}

impl std::fmt::Debug for ChannelAuthorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelAuthorizer")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .finish()
    }
}

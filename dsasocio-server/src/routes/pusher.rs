//! Private/presence channel auth handshake
//!
//! The client SDK posts `socket_id` and `channel_name` (form-encoded by
//! default) and expects `{"auth": "key:signature"}` back.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header::AUTHORIZATION, HeaderMap};
use axum::{routing::post, Json, Router};
use serde::Deserialize;

use dsasocio_core::{ChannelName, SocketId};

use crate::broker::ChannelAuth;
use crate::error::ApiError;
use crate::extractors::Payload;
use crate::state::AppState;

const ANONYMOUS: &str = "anonymous";

#[derive(Debug, Deserialize)]
pub struct AuthRequest {
    pub socket_id: Option<String>,
    pub channel_name: Option<String>,
}

/// User id from `Authorization: Bearer <id>`, or `anonymous`.
fn user_id(headers: &HeaderMap) -> String {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split_whitespace().nth(1))
        .unwrap_or(ANONYMOUS)
        .to_string()
}

/// POST /api/pusher/auth
async fn authenticate(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Payload(req): Payload<AuthRequest>,
) -> Result<Json<ChannelAuth>, ApiError> {
    let socket_id = SocketId::parse(req.socket_id.as_deref().unwrap_or_default())?;
    let channel = ChannelName::parse(req.channel_name.as_deref().unwrap_or_default())?;
    let user = user_id(&headers);

    let auth = state.authorizer.authorize(&socket_id, &channel, &user)?;
    tracing::debug!(%channel, %user, "channel subscription authorized");
    Ok(Json(auth))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/pusher/auth", post(authenticate))
}

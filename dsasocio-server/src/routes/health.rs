//! Health check endpoint
//!
//! Fires a real event so a 200 means the broker credentials work.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use serde_json::json;

use dsasocio_core::ChannelName;

use crate::error::ApiError;
use crate::state::AppState;

const HEALTH_CHANNEL: &str = "health-test";
const HEALTH_EVENT: &str = "test";

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub pusher: &'static str,
    pub store: &'static str,
    #[serde(rename = "corsOrigins")]
    pub cors_origins: Vec<String>,
}

/// GET /health
async fn health(State(state): State<Arc<AppState>>) -> Result<Json<HealthResponse>, ApiError> {
    let channel = ChannelName::parse(HEALTH_CHANNEL)?;
    let data = json!({
        "message": "Backend works!",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });
    state
        .broker
        .trigger(&channel, HEALTH_EVENT, &data, None)
        .await?;

    let store = match &state.store {
        None => "disabled",
        Some(store) if store.ping().await => "connected",
        Some(_) => "unreachable",
    };

    Ok(Json(HealthResponse {
        status: "OK",
        version: env!("CARGO_PKG_VERSION"),
        pusher: "working",
        store,
        cors_origins: state.cors.as_slice().to_vec(),
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}

//! API index and CORS diagnostics

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header::ORIGIN, HeaderMap};
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

const ENDPOINTS: [&str; 6] = [
    "/health",
    "/debug-cors",
    "/api/messages/send",
    "/api/messages/{chat_id}",
    "/api/pusher/auth",
    "/api",
];

#[derive(Serialize)]
pub struct IndexResponse {
    pub status: &'static str,
    pub endpoints: [&'static str; 6],
}

/// GET /api
async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        status: "DSA Socio Backend API",
        endpoints: ENDPOINTS,
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugCorsResponse {
    pub origin: String,
    pub allowed: bool,
    pub all_origins: Vec<String>,
    pub frontend_urls: Option<String>,
}

/// GET /debug-cors - would this request's Origin pass the CORS layer?
async fn debug_cors(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Json<DebugCorsResponse> {
    let origin = headers
        .get(ORIGIN)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    Json(DebugCorsResponse {
        allowed: state.cors.allows(Some(&origin)),
        origin,
        all_origins: state.cors.as_slice().to_vec(),
        frontend_urls: state.cors.frontend_urls.clone(),
    })
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api", get(index))
        .route("/debug-cors", get(debug_cors))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn index_lists_endpoints() {
        let Json(body) = index().await;
        assert_eq!(body.status, "DSA Socio Backend API");
        assert!(body.endpoints.contains(&"/api/messages/send"));
    }
}

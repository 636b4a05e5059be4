//! Axum server setup
//!
//! - CORS restricted to configured frontend origins
//! - Request tracing
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, Method};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::broker::{Broadcaster, BrokerError, ChannelAuthorizer, PusherClient};
use crate::config::{CorsOrigins, RelayConfig};
use crate::routes;
use crate::state::AppState;
use crate::store::{create_pool, MessageStore, PgMessageStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("broker setup failed: {0}")]
    Broker(#[from] BrokerError),

    #[error("database connection failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("database migration failed: {0}")]
    Store(#[from] StoreError),
}

fn cors_layer(origins: &CorsOrigins, permissive: bool) -> CorsLayer {
    if permissive {
        tracing::warn!("CORS: Permissive mode enabled - all origins mirrored");
        return CorsLayer::very_permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .as_slice()
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "skipping unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
            Method::PUT,
            Method::DELETE,
        ])
        .allow_headers([
            CONTENT_TYPE,
            AUTHORIZATION,
            HeaderName::from_static(routes::messages::SOCKET_ID_HEADER),
        ])
}

/// Build the application router with all routes and layers.
pub fn build_router(state: AppState, config: &RelayConfig) -> Router {
    let cors = cors_layer(&state.cors, config.cors_permissive);

    Router::new()
        .merge(routes::health::router())
        .merge(routes::api::router())
        .merge(routes::messages::router())
        .merge(routes::pusher::router())
        .layer(DefaultBodyLimit::max(config.body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Connect collaborators and serve until shutdown.
pub async fn run_server(config: RelayConfig) -> Result<(), ServerError> {
    let broker = PusherClient::new(config.pusher.clone())?;
    tracing::info!(broker = broker.name(), cluster = %config.pusher.cluster, "broker client ready");
    let authorizer = ChannelAuthorizer::new(&config.pusher.key, &config.pusher.secret);

    let store: Option<Arc<dyn MessageStore>> = match &config.database_url {
        Some(url) => {
            let store = PgMessageStore::new(create_pool(url).await?);
            store.migrate().await?;
            tracing::info!("message store connected");
            Some(Arc::new(store))
        }
        None => {
            tracing::warn!("no database configured - messages are relayed but not stored");
            None
        }
    };

    let state = AppState::new(
        Arc::new(broker),
        store,
        authorizer,
        config.cors_origins.clone(),
    );
    let app = build_router(state, &config);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Relay listening on {}", config.bind_addr);
    tracing::info!(origins = ?config.cors_origins.as_slice(), "CORS origins");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, starting shutdown"),
        _ = terminate => tracing::info!("Received SIGTERM, starting shutdown"),
    }
}

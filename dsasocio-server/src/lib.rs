//! dsasocio-server: chat relay for DSA Socio
//!
//! A thin axum service in front of two hosted collaborators:
//! - the database, where chat rows are persisted (optional)
//! - the pub/sub broker, which fans events out to connected clients
//!
//! Sending a message inserts a row, then triggers `new-message` on the
//! chat's channel with the sender's own connection excluded.

pub mod broker;
pub mod config;
pub mod error;
pub mod extractors;
pub mod pagination;
pub mod routes;
pub mod server;
pub mod state;
pub mod store;

pub use config::{ConfigError, CorsOrigins, PusherConfig, RelayConfig};
pub use error::ApiError;
pub use server::{build_router, run_server, ServerError};
pub use state::AppState;

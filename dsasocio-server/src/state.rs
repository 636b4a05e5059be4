//! Application state shared across handlers

use std::sync::Arc;

use crate::broker::{Broadcaster, ChannelAuthorizer};
use crate::config::CorsOrigins;
use crate::store::MessageStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub broker: Arc<dyn Broadcaster>,
    /// `None` runs the relay broadcast-only
    pub store: Option<Arc<dyn MessageStore>>,
    pub authorizer: ChannelAuthorizer,
    pub cors: CorsOrigins,
}

impl AppState {
    pub fn new(
        broker: Arc<dyn Broadcaster>,
        store: Option<Arc<dyn MessageStore>>,
        authorizer: ChannelAuthorizer,
        cors: CorsOrigins,
    ) -> Self {
        Self {
            broker,
            store,
            authorizer,
            cors,
        }
    }
}

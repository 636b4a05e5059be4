//! Command implementations for the dsasocio CLI

pub mod auth;
pub mod channel;
pub mod send;
pub mod serve;

pub use auth::run_auth;
pub use channel::run_channel;
pub use send::run_send;
pub use serve::run_serve;

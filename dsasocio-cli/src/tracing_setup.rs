//! Console tracing for the dsasocio binary
//!
//!   dsasocio --debug serve                 # debug everywhere
//!   RUST_LOG=dsasocio_server=debug dsasocio serve

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber. `RUST_LOG` wins over `--debug` when set.
pub fn init_tracing(debug: bool) -> Result<()> {
    let default = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(debug)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

//! Run the relay server

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;

use dsasocio_server::{run_server, RelayConfig};

#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (default: 0.0.0.0:$PORT, port 5000)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Mirror any Origin in CORS responses - development only
    #[arg(long)]
    pub cors_permissive: bool,

    /// Postgres URL for message persistence (omit to relay without storing)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}

pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let mut config = RelayConfig::from_env()
        .context("Invalid relay configuration. Set PUSHER_* variables in the environment or .env")?;

    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if args.cors_permissive {
        config.cors_permissive = true;
    }
    if args.database_url.is_some() {
        config.database_url = args.database_url;
    }

    tracing::info!("Starting DSA Socio relay on {}", config.bind_addr);

    run_server(config).await.context("Server error")?;
    Ok(())
}

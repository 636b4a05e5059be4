//! Sign a channel subscription with local credentials
//!
//! Prints exactly what `/api/pusher/auth` would return, which is handy
//! when debugging a client that cannot subscribe.

use anyhow::{Context, Result};
use clap::Parser;

use dsasocio_core::{ChannelName, SocketId};
use dsasocio_server::broker::ChannelAuthorizer;

#[derive(Parser, Debug)]
pub struct AuthArgs {
    /// Broker connection id, e.g. 123.456
    #[arg(long)]
    pub socket_id: String,

    /// Private or presence channel name
    #[arg(long)]
    pub channel: String,

    /// User id for presence channel data
    #[arg(long, default_value = "anonymous")]
    pub user: String,

    #[arg(long, env = "PUSHER_KEY", hide_env_values = true)]
    pub key: String,

    #[arg(long, env = "PUSHER_SECRET", hide_env_values = true)]
    pub secret: String,
}

pub fn run_auth(args: AuthArgs) -> Result<()> {
    let socket_id = SocketId::parse(&args.socket_id).context("Invalid --socket-id")?;
    let channel = ChannelName::parse(&args.channel).context("Invalid --channel")?;

    let authorizer = ChannelAuthorizer::new(args.key, args.secret);
    let auth = authorizer.authorize(&socket_id, &channel, &args.user)?;

    println!("{}", serde_json::to_string_pretty(&auth)?);
    Ok(())
}

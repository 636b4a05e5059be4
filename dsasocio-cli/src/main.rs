//! dsasocio CLI - DSA Socio chat relay
//!
//! - `serve`: run the HTTP relay (persist, broadcast, channel auth)
//! - `send`: post a chat message to a running relay
//! - `auth`: sign a private/presence channel subscription locally
//! - `channel`: canonical chat id and channel for two users

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "dsasocio",
    author,
    version,
    about = "Chat relay for DSA Socio",
    long_about = "Run the DSA Socio chat relay, send messages through it, and inspect \
                  the channel names and auth tokens its clients use."
)]
struct Cli {
    /// Debug logging (RUST_LOG still takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP relay server
    Serve(commands::serve::ServeArgs),
    /// Send a chat message through a running relay
    Send(commands::send::SendArgs),
    /// Print the auth response for a channel subscription
    Auth(commands::auth::AuthArgs),
    /// Print the chat id and channel name for two users
    Channel(commands::channel::ChannelArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; real environment variables win.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_setup::init_tracing(cli.debug).ok();

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::Send(args) => commands::run_send(args).await?,
        Commands::Auth(args) => commands::run_auth(args)?,
        Commands::Channel(args) => commands::run_channel(args)?,
    }
    Ok(())
}

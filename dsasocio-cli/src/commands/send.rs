//! Send a chat message through a running relay
//!
//! ```bash
//! dsasocio send --from alice --to bob -m "Two Sum done, your turn"
//! dsasocio send --chat room-1 --from alice -m hi --json | jq .id
//! ```

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use dsasocio_core::{ChatId, ChatMessage, SocketId};

const DEFAULT_ENDPOINT: &str = "http://localhost:5000";

#[derive(Parser, Debug)]
pub struct SendArgs {
    /// Relay base URL
    #[arg(long, env = "DSASOCIO_API_URL", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Sender user id
    #[arg(long)]
    pub from: String,

    /// Receiver user id (derives the pair chat id when --chat is omitted)
    #[arg(long)]
    pub to: Option<String>,

    /// Explicit chat id
    #[arg(long)]
    pub chat: Option<String>,

    /// Message text
    #[arg(long, short)]
    pub message: String,

    /// Channel to broadcast on (default: private-chat-<chat id>)
    #[arg(long)]
    pub channel: Option<String>,

    /// Display name carried in the broadcast
    #[arg(long)]
    pub name: Option<String>,

    /// Connection id to exclude from the broadcast
    #[arg(long)]
    pub socket_id: Option<String>,

    /// Print the stored row as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct SendBody<'a> {
    chat_id: &'a str,
    sender_id: &'a str,
    message: &'a str,
    channel: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    receiver_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sender_name: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

fn resolve_chat(args: &SendArgs) -> Result<ChatId> {
    match (&args.chat, &args.to) {
        (Some(chat), _) => ChatId::new(chat).context("Invalid --chat"),
        (None, Some(to)) => Ok(ChatId::for_pair(&args.from, to)),
        (None, None) => bail!("Pass --to <user> or --chat <id>"),
    }
}

async fn handle_response(response: reqwest::Response) -> Result<ChatMessage> {
    let status = response.status();
    if status.is_success() {
        return response.json().await.context("Failed to parse relay response");
    }

    let text = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorResponse>(&text) {
        Ok(err) => Err(anyhow!("API error: {}: {}", status, err.error)),
        Err(_) => Err(anyhow!("API error: {}", status)),
    }
}

pub async fn run_send(args: SendArgs) -> Result<()> {
    let chat = resolve_chat(&args)?;
    let channel = match &args.channel {
        Some(c) => c.clone(),
        None => chat.channel().to_string(),
    };

    let body = SendBody {
        chat_id: chat.as_str(),
        sender_id: &args.from,
        message: &args.message,
        channel: &channel,
        receiver_id: args.to.as_deref(),
        sender_name: args.name.as_deref(),
    };

    let url = format!("{}/api/messages/send", args.endpoint.trim_end_matches('/'));
    let mut request = Client::new().post(&url).json(&body);
    if let Some(raw) = &args.socket_id {
        let socket = SocketId::parse(raw).context("Invalid --socket-id")?;
        request = request.header("x-pusher-socket-id", socket.as_str());
    }

    tracing::debug!(%url, chat = %chat, "sending message");
    let response = request
        .send()
        .await
        .with_context(|| format!("Failed to reach relay at {}", args.endpoint))?;
    let row = handle_response(response).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&row)?);
    } else {
        println!("sent {} to {} at {}", row.id, row.chat_id, row.created_at.to_rfc3339());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(chat: Option<&str>, to: Option<&str>) -> SendArgs {
        SendArgs {
            endpoint: DEFAULT_ENDPOINT.into(),
            from: "bob".into(),
            to: to.map(Into::into),
            chat: chat.map(Into::into),
            message: "hi".into(),
            channel: None,
            name: None,
            socket_id: None,
            json: false,
        }
    }

    #[test]
    fn chat_from_pair() {
        let chat = resolve_chat(&args(None, Some("alice"))).unwrap();
        assert_eq!(chat.as_str(), "alice_bob");
    }

    #[test]
    fn explicit_chat_wins() {
        let chat = resolve_chat(&args(Some("room-1"), Some("alice"))).unwrap();
        assert_eq!(chat.as_str(), "room-1");
    }

    #[test]
    fn needs_a_target() {
        assert!(resolve_chat(&args(None, None)).is_err());
    }
}

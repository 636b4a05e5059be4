//! Chat id and channel for a pair of users

use anyhow::Result;
use clap::Parser;
use serde_json::json;

use dsasocio_core::ChatId;

#[derive(Parser, Debug)]
pub struct ChannelArgs {
    /// First user id
    pub user_a: String,

    /// Second user id
    pub user_b: String,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run_channel(args: ChannelArgs) -> Result<()> {
    let chat = ChatId::for_pair(&args.user_a, &args.user_b);
    let channel = chat.channel();

    if args.json {
        let out = json!({ "chat_id": chat.as_str(), "channel": channel.as_str() });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("chat_id: {}", chat);
        println!("channel: {}", channel);
    }
    Ok(())
}

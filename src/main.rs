use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use rb_cli::adapters::ConsoleMessenger;
use rb_cli::bootstrap::{load_config, load_credentials, load_dotenv, resolve_paths, wire_app};
use rb_cli::console::{ConsoleSession, Identity};
use rb_core::{AppConfig, ChannelId, GuildId, UserId};
use tokio::io::BufReader;
use tracing::info;

/// Queue osu! pp rework calculations from the terminal.
#[derive(Debug, Parser)]
#[command(name = "rework-bot", version, about)]
struct Args {
    /// TOML configuration file; built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Channel lines are posted in unless prefixed with `<user>@<channel>:`
    #[arg(long, default_value = "console")]
    channel: String,

    /// Acting user unless a line is prefixed
    #[arg(long, default_value = "local")]
    user: String,

    #[arg(long)]
    guild: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // .env may carry RUST_LOG as well as the credentials
    let dotenv = load_dotenv();
    rb_cli::bootstrap::tracing::init_tracing_subscriber()?;
    dotenv.report();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => resolve_paths(AppConfig::default())?,
    };
    let credentials = load_credentials().context("Missing osu! API credentials")?;

    let messenger = Arc::new(ConsoleMessenger::stdout());
    let runtime = wire_app(&config, credentials, messenger.clone())?;
    let identity = Identity {
        user: UserId::from(args.user),
        channel: ChannelId::from(args.channel),
        guild: args.guild.map(GuildId::from),
    };

    info!(user = %identity.user, channel = %identity.channel, "rework-bot ready, type !help");
    ConsoleSession::new(runtime, messenger, identity)
        .run(BufReader::new(tokio::io::stdin()))
        .await
}

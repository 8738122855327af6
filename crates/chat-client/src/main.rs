// crates/chat-client/src/main.rs

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use chat_client::app;
use chat_client::types::ClientConfig;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(name = "chat-client")]
#[clap(about = "Terminal client for the chat relay")]
struct Cli {
    /// Relay host
    #[clap(long)]
    host: Option<String>,

    /// Relay port
    #[clap(short, long)]
    port: Option<u16>,

    /// Display name; prompted for when missing
    #[clap(short, long)]
    username: Option<String>,

    /// TOML file with `host`, `port` and `username` keys
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[clap(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    if cli.debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_writer(io::stderr)
            .init();
    }

    let mut config = match &cli.config {
        Some(path) => ClientConfig::load(path)?,
        None => ClientConfig::default(),
    };
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if cli.username.is_some() {
        config.username = cli.username;
    }

    let username = match config.username.clone() {
        Some(name) => name,
        None => prompt_username()?,
    };

    info!("Joining {} as {:?}", config.server_addr(), username);
    app::run(&config.server_addr(), username).await
}

fn prompt_username() -> Result<String> {
    print!("Choose your username: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
}

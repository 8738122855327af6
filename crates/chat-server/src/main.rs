//! TCP chat relay.

use chat_server::config::Config;
use chat_server::server;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    info!(
        "Starting chat-server on {}:{} (max_clients = {}, filtered words = {})",
        config.bind_addr,
        config.port,
        config.max_clients,
        config.filter.words().len()
    );

    server::run_until(config, async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("ctrl-c received, shutting down"),
            Err(e) => {
                warn!(error = %e, "cannot listen for ctrl-c, running until killed");
                std::future::pending::<()>().await
            }
        }
    })
    .await
}

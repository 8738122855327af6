//! TCP listener and top-level relay wiring.
//!
//! This module:
//! - Listens on the configured address/port.
//! - Accepts new TCP connections, up to `max_clients` at a time.
//! - Assigns each connection a `SessionId`.
//! - Spawns one session task per connection.
//! - On shutdown, stops accepting and closes every registered session.
//!
//! The per-connection logic lives in `session`.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::Context;
use bytes::BytesMut;
use chat_core::notice;
use chat_protocol::encode_frame;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::registry::Registry;
use crate::session;
use crate::types::SessionId;

/// Counter for assigning unique `SessionId`s.
static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed);
    SessionId(id)
}

/// Bind the configured address and serve until the process is killed.
pub async fn run(config: Config) -> anyhow::Result<()> {
    run_until(config, std::future::pending()).await
}

/// Bind the configured address and serve until `shutdown` resolves.
pub async fn run_until<F>(config: Config, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()>,
{
    let addr = config.socket_addr_string();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    serve(listener, config, shutdown).await
}

/// Run the accept loop on an already bound listener.
pub async fn serve<F>(listener: TcpListener, config: Config, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()>,
{
    let registry = Registry::new();
    let filter = Arc::new(config.filter.clone());
    let slots = Arc::new(Semaphore::new(config.max_clients));

    tokio::pin!(shutdown);

    loop {
        let (stream, peer_addr) = tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok(pair) => pair,
                Err(e) => {
                    warn!(error = %e, "accept failed");
                    continue;
                }
            },
            _ = &mut shutdown => break,
        };

        let permit = match slots.clone().try_acquire_owned() {
            Ok(permit) => permit,
            Err(_) => {
                warn!(
                    "Rejecting connection from {}: max_clients ({}) reached",
                    peer_addr, config.max_clients
                );
                tokio::spawn(reject(stream));
                continue;
            }
        };

        let session_id = next_session_id();
        info!(session = %session_id, peer = %peer_addr, "accepted connection");

        let registry = registry.clone();
        let filter = filter.clone();
        let handshake_timeout = config.handshake_timeout;

        tokio::spawn(async move {
            let _permit = permit;
            let result =
                session::run_session(session_id, stream, registry, &filter, handshake_timeout)
                    .await;
            match result {
                Ok(()) => debug!(session = %session_id, "session ended"),
                Err(e) => warn!(session = %session_id, error = %e, "session ended with error"),
            }
        });
    }

    let closed = registry.clear().await;
    info!(sessions = closed, "relay shut down");
    Ok(())
}

/// Tell an over-limit connection the relay is full, then drop it.
async fn reject(mut stream: TcpStream) {
    let mut buf = BytesMut::new();
    encode_frame(notice::SERVER_FULL, &mut buf);
    let _ = stream.write_all(&buf).await;
    let _ = stream.shutdown().await;
}

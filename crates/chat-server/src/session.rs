// crates/chat-server/src/session.rs

//! Per-connection session handler.
//!
//! Lifecycle:
//! - **Handshake**: send `USERNAME`, take the next frame verbatim as the
//!   display name, register, announce the join to everyone. Names over
//!   `MAX_NAME_LEN` bytes are refused, and a connection that stays silent
//!   past the handshake timeout is dropped.
//! - **Active**: read frames one at a time and route each one (private
//!   message, moderation notice, or broadcast to everyone else).
//! - **Closing**: on EOF, read error, oversized frame or a dead writer,
//!   remove the session from the registry. Terminal.
//!
//! `/quit` is never parsed here; the client closes its transport and we
//! see EOF.

use std::io;
use std::time::Duration;

use bytes::BytesMut;
use chat_core::{classify, notice, ContentFilter, Inbound};
use chat_protocol::{decode_frame, encode_frame, ProtocolError, MAX_NAME_LEN, USERNAME_TOKEN};
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::registry::{Registry, RegistryError};
use crate::types::{OutboundRx, OutboundTx, SessionId};

/// Errors that end a single session. None of them affect other sessions.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("transport error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Run the session I/O loop for a single connection.
pub async fn run_session(
    session_id: SessionId,
    stream: TcpStream,
    registry: Registry,
    filter: &ContentFilter,
    handshake_timeout: Duration,
) -> Result<(), SessionError> {
    let (read_half, write_half) = stream.into_split();

    // Writer task: drains the outbound channel into the socket. It ends
    // once every `OutboundTx` is dropped, i.e. after registry removal.
    let (out_tx, out_rx): (OutboundTx, OutboundRx) = mpsc::unbounded_channel();
    let mut writer = tokio::spawn(run_writer(session_id, write_half, out_rx));

    let mut reader = FrameReader::new(read_half);

    // Handshake
    let _ = out_tx.send(USERNAME_TOKEN.to_string());
    let name = match tokio::time::timeout(handshake_timeout, reader.next_frame()).await {
        Ok(frame) => match frame? {
            Some(name) => name,
            None => {
                debug!(session = %session_id, "closed before handshake");
                return Ok(());
            }
        },
        Err(_) => {
            info!(session = %session_id, "no display name within {:?}", handshake_timeout);
            return Ok(());
        }
    };

    if name.len() > MAX_NAME_LEN {
        info!(session = %session_id, len = name.len(), "display name too long");
        // Queued before `out_tx` drops, so the writer flushes it, then closes.
        let _ = out_tx.send(notice::NAME_TOO_LONG.to_string());
        return Ok(());
    }

    registry.add(session_id, name.clone(), out_tx).await?;
    info!(session = %session_id, name = %name, "joined");
    registry.broadcast(&notice::joined(&name), None).await;

    // Active
    let result = loop {
        tokio::select! {
            frame = reader.next_frame() => match frame {
                Ok(Some(frame)) => dispatch(session_id, &frame, &registry, filter).await,
                Ok(None) => break Ok(()),
                Err(e) => break Err(e),
            },
            _ = &mut writer => {
                debug!(session = %session_id, "writer finished, closing session");
                break Ok(());
            }
        }
    };

    // Closing
    registry.remove(session_id).await;
    info!(session = %session_id, name = %name, "left");
    result
}

/// Route one frame from an active session.
async fn dispatch(session_id: SessionId, frame: &str, registry: &Registry, filter: &ContentFilter) {
    match classify(frame, filter) {
        Inbound::Private { target, content } => match registry.lookup(target).await {
            Some(target_id) => {
                let Some(sender) = registry.display_name(session_id).await else {
                    return;
                };
                debug!(session = %session_id, target = %target_id, "private message");
                registry
                    .send_to(target_id, &notice::private_from(&sender, content))
                    .await;
            }
            None => {
                registry.send_to(session_id, notice::USER_NOT_FOUND).await;
            }
        },
        Inbound::MalformedPrivate => {
            registry.send_to(session_id, notice::PRIVATE_USAGE).await;
        }
        Inbound::Filtered => {
            debug!(session = %session_id, "frame filtered");
            registry.send_to(session_id, notice::KEEP_IT_CLEAN).await;
        }
        Inbound::Broadcast => {
            registry.broadcast(frame, Some(session_id)).await;
        }
    }
}

async fn run_writer(
    session_id: SessionId,
    mut write_half: OwnedWriteHalf,
    mut out_rx: OutboundRx,
) -> Result<(), io::Error> {
    let mut buf = BytesMut::with_capacity(1024);

    while let Some(frame) = out_rx.recv().await {
        buf.clear();
        encode_frame(&frame, &mut buf);
        if let Err(e) = write_half.write_all(&buf).await {
            warn!(session = %session_id, error = %e, "write failed");
            return Err(e);
        }
    }

    // Channel closed: the session was removed.
    let _ = write_half.shutdown().await;
    Ok(())
}

/// Accumulates bytes from the read half and yields complete frames.
struct FrameReader {
    read_half: OwnedReadHalf,
    buffer: BytesMut,
}

impl FrameReader {
    fn new(read_half: OwnedReadHalf) -> Self {
        FrameReader {
            read_half,
            buffer: BytesMut::with_capacity(4096),
        }
    }

    /// Next complete frame, or `None` on EOF. A trailing partial frame at
    /// EOF is discarded.
    async fn next_frame(&mut self) -> Result<Option<String>, SessionError> {
        loop {
            if let Some(frame) = decode_frame(&mut self.buffer)? {
                return Ok(Some(frame));
            }
            if self.read_half.read_buf(&mut self.buffer).await? == 0 {
                return Ok(None);
            }
        }
    }
}

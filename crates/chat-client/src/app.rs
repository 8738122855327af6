// crates/chat-client/src/app.rs

//! Client session: handshake, then two concurrent loops.
//!
//! - The receive loop prints relay frames with a local `HH:MM` stamp and
//!   answers any `USERNAME` prompt.
//! - The send loop reads user lines, applies local commands and writes
//!   frames to the relay.
//!
//! The loops share the write half and a [`ShutdownSignal`]. `/quit`,
//! end of input or a lost connection fires the signal so the sibling
//! loop stops too.

use std::sync::Arc;

use anyhow::{bail, Result};
use chat_core::command::HELP_TEXT;
use chat_core::{interpret_input, ClientAction};
use chat_protocol::{MAX_FRAME_LEN, MAX_NAME_LEN, USERNAME_TOKEN};
use chrono::{Local, NaiveTime};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, watch, Mutex};
use tracing::{debug, info, warn};

use crate::network::{self, FrameReceiver, FrameSender};

pub const DISCONNECT_NOTICE: &str = "\n[!] Lost connection to server.";
pub const TOO_LONG_NOTICE: &str = "[!] Message too long, not sent.";

/// Write half shared by both loops.
pub type SharedSender<W> = Arc<Mutex<FrameSender<W>>>;

/// One-shot, cloneable stop flag shared by the two loops.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once [`ShutdownSignal::trigger`] has been called,
    /// immediately if it already was.
    pub async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives as long as `self`, so this cannot fail.
        let _ = rx.wait_for(|stopped| *stopped).await;
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// `[HH:MM] <frame>`
pub fn format_incoming(frame: &str, at: NaiveTime) -> String {
    format!("[{}] {}", at.format("%H:%M"), frame)
}

/// Wait for the relay's `USERNAME` prompt and answer it.
///
/// Anything the relay sends first (e.g. a "server full" notice) is shown
/// to the user.
pub async fn handshake<R, W, O>(
    frames: &mut FrameReceiver<R>,
    sender: &SharedSender<W>,
    username: &str,
    out: &mut O,
) -> Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
    O: AsyncWrite + Unpin,
{
    loop {
        match frames.next_frame().await? {
            Some(frame) if frame == USERNAME_TOKEN => {
                sender.lock().await.send(username).await?;
                debug!("Handshake complete as {:?}", username);
                return Ok(());
            }
            Some(frame) => print_line(out, &format_incoming(&frame, Local::now().time())).await?,
            None => bail!("relay closed the connection before the handshake"),
        }
    }
}

/// Print relay frames until the connection drops or shutdown is signalled.
pub async fn run_receive_loop<R, W, O>(
    mut frames: FrameReceiver<R>,
    sender: SharedSender<W>,
    username: String,
    mut out: O,
    shutdown: ShutdownSignal,
) -> Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
    O: AsyncWrite + Unpin,
{
    loop {
        let frame = tokio::select! {
            biased;
            _ = shutdown.wait() => break,
            frame = frames.next_frame() => frame,
        };

        match frame {
            Ok(Some(frame)) if frame == USERNAME_TOKEN => {
                if let Err(e) = sender.lock().await.send(&username).await {
                    warn!("Failed to answer username prompt: {}", e);
                    break lost_connection(&mut out, &shutdown).await;
                }
            }
            Ok(Some(frame)) => {
                print_line(&mut out, &format_incoming(&frame, Local::now().time())).await?;
            }
            Ok(None) => {
                info!("Relay closed the connection");
                break lost_connection(&mut out, &shutdown).await;
            }
            Err(e) => {
                warn!("Read error: {}", e);
                break lost_connection(&mut out, &shutdown).await;
            }
        }
    }

    Ok(())
}

/// Turn user lines into frames until `/quit`, end of input, a failed
/// write or shutdown.
pub async fn run_send_loop<W, O>(
    mut input: mpsc::UnboundedReceiver<String>,
    sender: SharedSender<W>,
    username: String,
    mut out: O,
    shutdown: ShutdownSignal,
) -> Result<()>
where
    W: AsyncWrite + Unpin,
    O: AsyncWrite + Unpin,
{
    loop {
        let line = tokio::select! {
            biased;
            _ = shutdown.wait() => break,
            line = input.recv() => line,
        };

        let Some(line) = line else {
            debug!("Input closed");
            close_and_stop(&sender, &shutdown).await;
            break;
        };

        match interpret_input(&line, &username) {
            ClientAction::Quit => {
                close_and_stop(&sender, &shutdown).await;
                break;
            }
            ClientAction::Help => print_line(&mut out, HELP_TEXT).await?,
            ClientAction::Send(frame) if frame.len() > MAX_FRAME_LEN => {
                print_line(&mut out, TOO_LONG_NOTICE).await?;
            }
            ClientAction::Send(frame) => {
                if let Err(e) = sender.lock().await.send(&frame).await {
                    warn!("Failed to send: {}", e);
                    shutdown.trigger();
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Connect, handshake, and run both loops against the terminal.
pub async fn run(server_addr: &str, username: String) -> Result<()> {
    if username.len() > MAX_NAME_LEN {
        bail!("username is longer than {} bytes", MAX_NAME_LEN);
    }

    let (mut frames, writer) = network::connect(server_addr).await?;
    let sender: SharedSender<_> = Arc::new(Mutex::new(writer));

    let mut stdout = tokio::io::stdout();
    handshake(&mut frames, &sender, &username, &mut stdout).await?;

    let shutdown = ShutdownSignal::new();
    let input = spawn_stdin_reader();

    let receive = tokio::spawn(run_receive_loop(
        frames,
        sender.clone(),
        username.clone(),
        tokio::io::stdout(),
        shutdown.clone(),
    ));
    let send = tokio::spawn(run_send_loop(
        input,
        sender,
        username,
        tokio::io::stdout(),
        shutdown,
    ));

    let (receive, send) = tokio::join!(receive, send);
    receive??;
    send??;
    Ok(())
}

/// Blocking stdin lines, forwarded from a plain thread. The thread is
/// left behind on exit; a blocked console read cannot be cancelled.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

async fn lost_connection<O: AsyncWrite + Unpin>(out: &mut O, shutdown: &ShutdownSignal) {
    let _ = print_line(out, DISCONNECT_NOTICE).await;
    shutdown.trigger();
}

async fn close_and_stop<W: AsyncWrite + Unpin>(sender: &SharedSender<W>, shutdown: &ShutdownSignal) {
    // Stop the receive loop first so the relay's EOF is not reported as
    // a lost connection.
    shutdown.trigger();
    if let Err(e) = sender.lock().await.close().await {
        debug!("Close failed: {}", e);
    }
}

async fn print_line<O: AsyncWrite + Unpin>(out: &mut O, line: &str) -> std::io::Result<()> {
    out.write_all(line.as_bytes()).await?;
    out.write_all(b"\n").await?;
    out.flush().await
}

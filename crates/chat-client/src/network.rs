// crates/chat-client/src/network.rs

use anyhow::{Context, Result};
use bytes::BytesMut;
use chat_protocol::{decode_frame_with_limit, encode_frame, MAX_RELAY_FRAME_LEN};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tracing::{debug, info};

/// Read side of the relay connection.
pub struct FrameReceiver<R> {
    reader: R,
    read_buffer: BytesMut,
}

impl<R: AsyncRead + Unpin> FrameReceiver<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            read_buffer: BytesMut::with_capacity(8192),
        }
    }

    /// Next complete frame, or `None` once the relay closes the connection.
    ///
    /// Relay frames may exceed the client limit by an envelope, so the
    /// larger relay bound applies here.
    pub async fn next_frame(&mut self) -> Result<Option<String>> {
        loop {
            let decoded = decode_frame_with_limit(&mut self.read_buffer, MAX_RELAY_FRAME_LEN)?;
            if let Some(frame) = decoded {
                debug!("Received frame: {:?}", frame);
                return Ok(Some(frame));
            }
            let n = self.reader.read_buf(&mut self.read_buffer).await?;
            if n == 0 {
                return Ok(None);
            }
        }
    }
}

/// Write side of the relay connection.
pub struct FrameSender<W> {
    writer: W,
    write_buffer: BytesMut,
    closed: bool,
}

impl<W: AsyncWrite + Unpin> FrameSender<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            write_buffer: BytesMut::with_capacity(4096),
            closed: false,
        }
    }

    pub async fn send(&mut self, text: &str) -> Result<()> {
        if self.closed {
            anyhow::bail!("connection already closed");
        }

        self.write_buffer.clear();
        encode_frame(text, &mut self.write_buffer);

        self.writer.write_all(&self.write_buffer).await?;
        self.writer.flush().await?;

        debug!("Sent frame: {:?}", text);
        Ok(())
    }

    /// Shut the write direction down. The relay sees EOF and drops the
    /// session. Closing twice is a no-op.
    pub async fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.writer.shutdown().await?;
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

/// Open a TCP connection to the relay and split it into framed halves.
pub async fn connect(
    server_addr: &str,
) -> Result<(FrameReceiver<OwnedReadHalf>, FrameSender<OwnedWriteHalf>)> {
    info!("Connecting to {}...", server_addr);

    let stream = TcpStream::connect(server_addr)
        .await
        .with_context(|| format!("cannot connect to {}", server_addr))?;
    stream.set_nodelay(true)?;
    info!("Connected successfully");

    let (read_half, write_half) = stream.into_split();
    Ok((FrameReceiver::new(read_half), FrameSender::new(write_half)))
}

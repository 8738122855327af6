// crates/chat-protocol/src/line_codec.rs

//! Newline-delimited text codec.
//!
//! ```text
//! <utf-8 text>\n
//! ```
//!
//! A single `\r` right before the `\n` is dropped so that line-based tools
//! (netcat, telnet) interoperate. Nothing else is trimmed. Invalid UTF-8
//! is replaced lossily rather than rejected.

use bytes::{BufMut, BytesMut};
use thiserror::Error;

use crate::wire_types::{DELIMITER, MAX_FRAME_LEN};

/// Errors that can arise while decoding a stream of frames.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// More than [`MAX_FRAME_LEN`] bytes arrived without a delimiter.
    #[error("frame exceeds {max} bytes without a newline")]
    FrameTooLong { max: usize },
}

/// Append `text` as one frame to `out`.
pub fn encode_frame(text: &str, out: &mut BytesMut) {
    out.reserve(text.len() + 1);
    out.put_slice(text.as_bytes());
    out.put_u8(DELIMITER);
}

/// Try to take one complete frame of at most [`MAX_FRAME_LEN`] bytes off
/// the front of `buf`.
///
/// Returns `Ok(None)` when more bytes are needed. Consumed bytes
/// (including the delimiter) are removed from `buf`.
pub fn decode_frame(buf: &mut BytesMut) -> Result<Option<String>, ProtocolError> {
    decode_frame_with_limit(buf, MAX_FRAME_LEN)
}

/// Same as [`decode_frame`] with a caller-chosen limit. Clients decode
/// relay output with `MAX_RELAY_FRAME_LEN`.
pub fn decode_frame_with_limit(
    buf: &mut BytesMut,
    max: usize,
) -> Result<Option<String>, ProtocolError> {
    let newline_pos = match buf.iter().position(|&b| b == DELIMITER) {
        Some(pos) => pos,
        None => {
            // A trailing `\r` may still be the first half of a CRLF.
            let pending_cr = usize::from(buf.last() == Some(&b'\r'));
            if buf.len() > max + pending_cr {
                return Err(ProtocolError::FrameTooLong { max });
            }
            return Ok(None);
        }
    };

    let line = buf.split_to(newline_pos + 1);
    let mut body = &line[..newline_pos];
    if let Some((&b'\r', rest)) = body.split_last() {
        body = rest;
    }

    if body.len() > max {
        return Err(ProtocolError::FrameTooLong { max });
    }

    Ok(Some(String::from_utf8_lossy(body).into_owned()))
}

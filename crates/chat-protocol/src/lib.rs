//! chat-protocol
//!
//! Wire-level framing for the chat relay.
//!
//! TCP is a byte stream, so every logical message travels as one
//! newline-terminated UTF-8 line:
//!
//! - [`wire_types`] : handshake token and framing limits
//! - [`line_codec`] : encode a frame / pull complete frames out of a buffer

pub mod line_codec;
pub mod wire_types;

pub use line_codec::{decode_frame, decode_frame_with_limit, encode_frame, ProtocolError};
pub use wire_types::{MAX_FRAME_LEN, MAX_NAME_LEN, MAX_RELAY_FRAME_LEN, USERNAME_TOKEN};

//! Shared wire constants.

/// First frame a relay sends to a new connection. The client answers
/// with its display name as the next frame.
pub const USERNAME_TOKEN: &str = "USERNAME";

/// Frame delimiter.
pub const DELIMITER: u8 = b'\n';

/// Largest frame a client may send, in bytes, excluding the delimiter.
pub const MAX_FRAME_LEN: usize = 4096;

/// Largest display name the relay accepts during the handshake.
pub const MAX_NAME_LEN: usize = 64;

/// Bytes the relay adds around a client's name and text when it wraps
/// them in an envelope such as `[PM from <name>]: <text>`.
pub const MAX_ENVELOPE_OVERHEAD: usize = 32;

/// Largest frame the relay can send. Private messages carry a full
/// client frame's text plus the sender's name and envelope.
pub const MAX_RELAY_FRAME_LEN: usize = MAX_FRAME_LEN + MAX_NAME_LEN + MAX_ENVELOPE_OVERHEAD;

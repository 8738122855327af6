//! Server-originated notices and envelopes.
//!
//! Notices are plain chat lines; nothing on the wire distinguishes them
//! from peer messages.

pub const USER_NOT_FOUND: &str = "System: User not found.";
pub const KEEP_IT_CLEAN: &str = "System: Please keep the chat clean!";
pub const PRIVATE_USAGE: &str = "System: Usage: /msg <username> <message>";
pub const SERVER_FULL: &str = "System: Server is full.";
pub const NAME_TOO_LONG: &str = "System: Display name too long.";

/// Broadcast once a session finishes its handshake.
pub fn joined(name: &str) -> String {
    format!("{} joined the chat!", name)
}

/// Envelope for a private message delivered to its target.
pub fn private_from(sender: &str, content: &str) -> String {
    format!("[PM from {}]: {}", sender, content)
}

//! Shared types for the chat relay.
//!
//! This module defines:
//! - `SessionId`: a lightweight handle for connected sessions
//! - the outbound channel aliases that stand in for a session's transport

use std::fmt;

use tokio::sync::mpsc;

/// Identifier for a connected session.
///
/// This is intentionally opaque; we just guarantee uniqueness
/// over the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Outbound frames to a given session. The receiving side is drained by
/// the task that owns the TCP write half.
pub type OutboundTx = mpsc::UnboundedSender<String>;
pub type OutboundRx = mpsc::UnboundedReceiver<String>;

//! Connection registry.
//!
//! Maps each `SessionId` to its display name and outbound channel. Every
//! operation goes through one lock, so broadcast iteration never
//! interleaves with an add or remove.
//!
//! Dropping a session's `OutboundTx` ends its writer task, which shuts the
//! TCP write half down. A failed channel send means that writer already
//! died on a write error, so the recipient is removed on the spot.

use std::sync::Arc;

use indexmap::IndexMap;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

use crate::types::{OutboundTx, SessionId};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("session {0} is already registered")]
    DuplicateId(SessionId),
}

#[derive(Debug)]
struct Session {
    name: String,
    tx: OutboundTx,
}

/// Registry of connected sessions.
///
/// Cloning is cheap and every clone sees the same sessions. Iteration
/// order is join order.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    sessions: Arc<RwLock<IndexMap<SessionId, Session>>>,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    /// Register a session that has completed its handshake.
    pub async fn add(
        &self,
        id: SessionId,
        name: String,
        tx: OutboundTx,
    ) -> Result<(), RegistryError> {
        let mut guard = self.sessions.write().await;
        if guard.contains_key(&id) {
            return Err(RegistryError::DuplicateId(id));
        }
        guard.insert(id, Session { name, tx });
        Ok(())
    }

    /// Remove a session, closing its transport. Removing an id that is not
    /// present is a no-op. Returns whether anything was removed.
    pub async fn remove(&self, id: SessionId) -> bool {
        let mut guard = self.sessions.write().await;
        guard.shift_remove(&id).is_some()
    }

    /// Deliver `frame` to every session except `exclude`.
    ///
    /// Recipients whose transport is gone are removed; delivery to the
    /// rest continues. Returns the number of sessions the frame reached.
    pub async fn broadcast(&self, frame: &str, exclude: Option<SessionId>) -> usize {
        let mut guard = self.sessions.write().await;

        let mut delivered = 0;
        let mut dead = Vec::new();
        for (id, session) in guard.iter() {
            if Some(*id) == exclude {
                continue;
            }
            if session.tx.send(frame.to_string()).is_ok() {
                delivered += 1;
            } else {
                dead.push(*id);
            }
        }

        for id in dead {
            debug!(session = %id, "dropping session after failed broadcast");
            guard.shift_remove(&id);
        }

        delivered
    }

    /// Deliver `frame` to one session. A failed delivery removes it.
    pub async fn send_to(&self, id: SessionId, frame: &str) -> bool {
        let mut guard = self.sessions.write().await;
        let sent = match guard.get(&id) {
            Some(session) => session.tx.send(frame.to_string()).is_ok(),
            None => return false,
        };
        if !sent {
            debug!(session = %id, "dropping session after failed send");
            guard.shift_remove(&id);
        }
        sent
    }

    /// First session (in join order) whose display name is `name`.
    pub async fn lookup(&self, name: &str) -> Option<SessionId> {
        let guard = self.sessions.read().await;
        guard
            .iter()
            .find(|(_, session)| session.name == name)
            .map(|(id, _)| *id)
    }

    /// Display name registered for `id`.
    pub async fn display_name(&self, id: SessionId) -> Option<String> {
        let guard = self.sessions.read().await;
        guard.get(&id).map(|session| session.name.clone())
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Remove every session, closing all transports. Returns how many
    /// were removed.
    pub async fn clear(&self) -> usize {
        let mut guard = self.sessions.write().await;
        let count = guard.len();
        guard.clear();
        count
    }
}

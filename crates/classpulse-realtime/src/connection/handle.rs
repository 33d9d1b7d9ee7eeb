//! Individual WebSocket connection handle.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::message::types::OutboundFrame;

/// Unique connection identifier.
pub type ConnectionId = Uuid;

/// Identity and routing metadata bound by the first valid auth message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    /// Authenticated user id.
    pub user_id: i64,
    /// Department for department-scoped delivery.
    pub department_id: Option<i64>,
    /// Subscribed subjects for subject-scoped delivery.
    pub subjects: HashSet<String>,
}

/// A handle to a single WebSocket connection.
///
/// Holds the bounded sender feeding the connection's dedicated writer
/// task, plus routing metadata. The raw transport never leaves the
/// API layer; every other component talks to the connection through
/// this handle.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID.
    pub id: ConnectionId,
    /// When the connection was established.
    pub connected_at: DateTime<Utc>,
    /// Sender half of the bounded outbound queue.
    sender: mpsc::Sender<OutboundFrame>,
    /// Identity bound by the auth message; `None` until then.
    identity: RwLock<Option<ClientIdentity>>,
    /// Heartbeat bookkeeping: cleared when a probe is sent, set again by
    /// the peer's pong. A connection found cleared at sweep time has
    /// missed a full probe window.
    alive: AtomicBool,
    /// Whether the transport is still usable. Cleared on queue overflow,
    /// writer shutdown, or eviction; a closed connection is skipped by
    /// every send path.
    open: AtomicBool,
}

impl ConnectionHandle {
    /// Create a new handle around the sender half of an outbound queue.
    pub fn new(sender: mpsc::Sender<OutboundFrame>) -> Self {
        Self {
            id: Uuid::new_v4(),
            connected_at: Utc::now(),
            sender,
            identity: RwLock::new(None),
            alive: AtomicBool::new(true),
            open: AtomicBool::new(true),
        }
    }

    /// Enqueue a serialized event for this connection.
    ///
    /// Never blocks. A full queue means the peer is not draining fast
    /// enough; the connection is marked unusable so the next heartbeat
    /// sweep evicts it instead of the dispatch loop stalling.
    pub fn send_event(&self, payload: String) -> bool {
        self.send_frame(OutboundFrame::Event(payload))
    }

    /// Enqueue a heartbeat probe.
    pub fn send_ping(&self) -> bool {
        self.send_frame(OutboundFrame::Ping)
    }

    /// Ask the writer task to close the transport.
    pub fn send_close(&self) {
        self.open.store(false, Ordering::SeqCst);
        let _ = self.sender.try_send(OutboundFrame::Close);
    }

    fn send_frame(&self, frame: OutboundFrame) -> bool {
        if !self.is_open() {
            return false;
        }
        match self.sender.try_send(frame) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(conn_id = %self.id, "Outbound queue full, scheduling eviction");
                self.open.store(false, Ordering::SeqCst);
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.open.store(false, Ordering::SeqCst);
                false
            }
        }
    }

    /// Bind (or re-bind) identity metadata.
    pub fn bind_identity(&self, identity: ClientIdentity) {
        let mut guard = self.identity.write().expect("identity lock poisoned");
        *guard = Some(identity);
    }

    /// A point-in-time copy of the bound identity, if any.
    pub fn identity(&self) -> Option<ClientIdentity> {
        self.identity.read().expect("identity lock poisoned").clone()
    }

    /// Whether an auth message has bound an identity.
    pub fn is_authenticated(&self) -> bool {
        self.identity
            .read()
            .expect("identity lock poisoned")
            .is_some()
    }

    /// Record a pong from the peer.
    pub fn mark_alive(&self) {
        self.alive.store(true, Ordering::SeqCst);
    }

    /// Clear the liveness flag ahead of a probe.
    pub fn mark_pending_ping(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }

    /// Whether the peer has answered since the last probe.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Whether the transport is still usable.
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    /// Mark the transport unusable (writer gone or connection evicted).
    pub fn mark_closed(&self) {
        self.open.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(user_id: i64) -> ClientIdentity {
        ClientIdentity {
            user_id,
            department_id: None,
            subjects: HashSet::new(),
        }
    }

    #[tokio::test]
    async fn test_rebind_overwrites_identity() {
        let (tx, _rx) = mpsc::channel(4);
        let handle = ConnectionHandle::new(tx);

        assert!(!handle.is_authenticated());
        handle.bind_identity(identity(1));
        handle.bind_identity(identity(2));
        assert_eq!(handle.identity().unwrap().user_id, 2);
    }

    #[tokio::test]
    async fn test_queue_overflow_closes_connection() {
        let (tx, _rx) = mpsc::channel(1);
        let handle = ConnectionHandle::new(tx);

        assert!(handle.send_event("a".into()));
        assert!(!handle.send_event("b".into()));
        assert!(!handle.is_open());
        // Subsequent sends short-circuit.
        assert!(!handle.send_event("c".into()));
    }
}

//! Connection registry — the single shared structure tracking all open
//! connections and their routing metadata.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::message::types::OutboundFrame;

use super::handle::{ClientIdentity, ConnectionHandle, ConnectionId};

/// Thread-safe registry of all open WebSocket connections.
///
/// Registration, identity binding, and snapshotting may all race; the
/// map is only ever locked per-shard and never held across a send, so a
/// slow peer cannot stall admission of other connections.
#[derive(Debug)]
pub struct ConnectionRegistry {
    connections: DashMap<ConnectionId, Arc<ConnectionHandle>>,
    send_queue_size: usize,
}

impl ConnectionRegistry {
    /// Create an empty registry.
    ///
    /// `send_queue_size` bounds each connection's outbound queue.
    pub fn new(send_queue_size: usize) -> Self {
        Self {
            connections: DashMap::new(),
            send_queue_size,
        }
    }

    /// Admit a new, unauthenticated connection.
    ///
    /// Returns the handle plus the receiver half of its outbound queue,
    /// which the caller hands to the connection's dedicated writer task.
    pub fn register(&self) -> (Arc<ConnectionHandle>, mpsc::Receiver<OutboundFrame>) {
        let (tx, rx) = mpsc::channel(self.send_queue_size);
        let handle = Arc::new(ConnectionHandle::new(tx));
        self.connections.insert(handle.id, handle.clone());

        info!(conn_id = %handle.id, "WebSocket connection registered");
        (handle, rx)
    }

    /// Bind identity metadata to a connection.
    ///
    /// A no-op if the connection is already gone; a repeat auth simply
    /// overwrites the previous binding.
    pub fn authenticate(&self, conn_id: &ConnectionId, identity: ClientIdentity) {
        if let Some(handle) = self.connections.get(conn_id) {
            debug!(
                conn_id = %conn_id,
                user_id = identity.user_id,
                "Connection authenticated"
            );
            handle.bind_identity(identity);
        }
    }

    /// Remove a connection. Safe to call multiple times.
    pub fn unregister(&self, conn_id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        if let Some((_, handle)) = self.connections.remove(conn_id) {
            handle.mark_closed();
            info!(conn_id = %conn_id, "WebSocket connection unregistered");
            Some(handle)
        } else {
            None
        }
    }

    /// Look up a connection by id.
    pub fn get(&self, conn_id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        self.connections.get(conn_id).map(|entry| entry.value().clone())
    }

    /// A point-in-time copy of all connections, for iteration by the
    /// dispatcher and the heartbeat sweep.
    pub fn snapshot(&self) -> Vec<Arc<ConnectionHandle>> {
        self.connections
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Record a pong from a connection.
    pub fn mark_alive(&self, conn_id: &ConnectionId) {
        if let Some(handle) = self.connections.get(conn_id) {
            handle.mark_alive();
        }
    }

    /// Total number of open connections.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Number of connections with a bound identity.
    pub fn authenticated_count(&self) -> usize {
        self.connections
            .iter()
            .filter(|entry| entry.value().is_authenticated())
            .count()
    }
}

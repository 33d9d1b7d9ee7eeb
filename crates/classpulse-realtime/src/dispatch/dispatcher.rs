//! Best-effort broadcast fan-out over the connection registry.

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::connection::registry::ConnectionRegistry;
use crate::message::types::encode_event;

use super::filter::BroadcastFilter;

/// Computes the recipient subset for an event and enqueues it on every
/// matching connection.
///
/// Delivery is at-most-once per connection per call, with no ordering
/// guarantee across connections and no retry. A failed enqueue is logged
/// and skipped; it never aborts delivery to the remaining connections
/// and never surfaces to the caller.
#[derive(Debug)]
pub struct BroadcastDispatcher {
    registry: Arc<ConnectionRegistry>,
}

impl BroadcastDispatcher {
    /// Create a dispatcher over a registry.
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Fan an event out to every connection matching the filter.
    ///
    /// The envelope is serialized once; each matching connection gets its
    /// own enqueue. Returns the number of connections the event was
    /// enqueued for.
    pub fn broadcast(
        &self,
        event_type: &str,
        data: serde_json::Value,
        filter: &BroadcastFilter,
    ) -> usize {
        let payload = match encode_event(event_type, &data) {
            Ok(payload) => payload,
            Err(e) => {
                error!(event_type, error = %e, "Failed to serialize event");
                return 0;
            }
        };

        let mut delivered = 0;
        for conn in self.registry.snapshot() {
            if !conn.is_open() {
                continue;
            }
            if !filter.matches(conn.identity().as_ref()) {
                continue;
            }
            if conn.send_event(payload.clone()) {
                delivered += 1;
            } else {
                warn!(conn_id = %conn.id, event_type, "Failed to enqueue event");
            }
        }

        debug!(event_type, delivered, "Broadcast dispatched");
        delivered
    }

    /// Deliver an event to a single user's connections.
    pub fn send_to_user(&self, user_id: i64, event_type: &str, data: serde_json::Value) -> usize {
        self.broadcast(event_type, data, &BroadcastFilter::user(user_id))
    }

    /// Deliver an event to every connection in a department.
    pub fn send_to_department(
        &self,
        department_id: i64,
        event_type: &str,
        data: serde_json::Value,
    ) -> usize {
        self.broadcast(event_type, data, &BroadcastFilter::department(department_id))
    }

    /// Deliver an event to every connection subscribed to a subject.
    pub fn send_to_subject(
        &self,
        subject: &str,
        event_type: &str,
        data: serde_json::Value,
    ) -> usize {
        self.broadcast(event_type, data, &BroadcastFilter::subject(subject))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::handle::ClientIdentity;
    use crate::message::types::OutboundFrame;
    use std::collections::HashSet;
    use tokio::sync::mpsc;

    fn identity(user_id: i64, department_id: Option<i64>, subjects: &[&str]) -> ClientIdentity {
        ClientIdentity {
            user_id,
            department_id,
            subjects: subjects.iter().map(|s| s.to_string()).collect::<HashSet<_>>(),
        }
    }

    fn drain(rx: &mut mpsc::Receiver<OutboundFrame>) -> Vec<String> {
        let mut events = Vec::new();
        while let Ok(frame) = rx.try_recv() {
            if let OutboundFrame::Event(text) = frame {
                events.push(text);
            }
        }
        events
    }

    #[tokio::test]
    async fn test_department_scoped_broadcast() {
        let registry = Arc::new(ConnectionRegistry::new(8));
        let dispatcher = BroadcastDispatcher::new(registry.clone());

        let (dept5, mut rx5) = registry.register();
        registry.authenticate(&dept5.id, identity(1, Some(5), &[]));
        let (dept7, mut rx7) = registry.register();
        registry.authenticate(&dept7.id, identity(2, Some(7), &[]));
        let (_anon, mut rx_anon) = registry.register();

        let delivered = dispatcher.broadcast(
            "poll:created",
            serde_json::json!({"id": 1}),
            &BroadcastFilter::department(5),
        );

        assert_eq!(delivered, 1);
        assert_eq!(drain(&mut rx5).len(), 1);
        assert!(drain(&mut rx7).is_empty());
        assert!(drain(&mut rx_anon).is_empty());
    }

    #[tokio::test]
    async fn test_empty_filter_reaches_everyone() {
        let registry = Arc::new(ConnectionRegistry::new(8));
        let dispatcher = BroadcastDispatcher::new(registry.clone());

        let (auth, mut rx_auth) = registry.register();
        registry.authenticate(&auth.id, identity(1, Some(5), &["Math"]));
        let (_anon, mut rx_anon) = registry.register();

        let delivered =
            dispatcher.broadcast("announcement", serde_json::json!({}), &BroadcastFilter::all());

        assert_eq!(delivered, 2);
        assert_eq!(drain(&mut rx_auth).len(), 1);
        assert_eq!(drain(&mut rx_anon).len(), 1);
    }

    #[tokio::test]
    async fn test_subject_scoped_broadcast() {
        let registry = Arc::new(ConnectionRegistry::new(8));
        let dispatcher = BroadcastDispatcher::new(registry.clone());

        let (math, mut rx_math) = registry.register();
        registry.authenticate(&math.id, identity(1, None, &["Math"]));
        let (physics, mut rx_physics) = registry.register();
        registry.authenticate(&physics.id, identity(2, None, &["Physics"]));
        let (_anon, mut rx_anon) = registry.register();

        let delivered =
            dispatcher.send_to_subject("Math", "x", serde_json::json!({}));

        assert_eq!(delivered, 1);
        assert_eq!(drain(&mut rx_math).len(), 1);
        assert!(drain(&mut rx_physics).is_empty());
        assert!(drain(&mut rx_anon).is_empty());
    }

    #[tokio::test]
    async fn test_one_full_queue_does_not_stop_the_fanout() {
        let registry = Arc::new(ConnectionRegistry::new(1));
        let dispatcher = BroadcastDispatcher::new(registry.clone());

        let (slow, _rx_slow) = registry.register();
        registry.authenticate(&slow.id, identity(1, Some(5), &[]));
        let (fast, mut rx_fast) = registry.register();
        registry.authenticate(&fast.id, identity(2, Some(5), &[]));

        // Fill the slow connection's queue.
        assert!(slow.send_event("filler".into()));

        let delivered =
            dispatcher.send_to_department(5, "poll:vote", serde_json::json!({"id": 1}));

        // The slow peer is dropped and marked for eviction; the fast peer
        // still gets the event.
        assert_eq!(delivered, 1);
        assert!(!slow.is_open());
        assert_eq!(drain(&mut rx_fast).len(), 1);
    }

    #[tokio::test]
    async fn test_unregistered_connection_receives_nothing() {
        let registry = Arc::new(ConnectionRegistry::new(8));
        let dispatcher = BroadcastDispatcher::new(registry.clone());

        let (conn, mut rx) = registry.register();
        registry.authenticate(&conn.id, identity(1, Some(5), &[]));
        registry.unregister(&conn.id);

        dispatcher.send_to_department(5, "poll:vote", serde_json::json!({}));
        assert!(drain(&mut rx).is_empty());
    }
}

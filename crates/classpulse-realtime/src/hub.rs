//! Top-level real-time hub that ties together the registry, dispatcher,
//! and heartbeat monitor.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use classpulse_core::config::realtime::RealtimeConfig;

use crate::connection::handle::{ClientIdentity, ConnectionId};
use crate::connection::heartbeat::HeartbeatMonitor;
use crate::connection::registry::ConnectionRegistry;
use crate::dispatch::dispatcher::BroadcastDispatcher;
use crate::message::types::{encode_event, InboundMessage};

/// Counters exposed on the health endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct HubStats {
    /// Open connections.
    pub connections: usize,
    /// Connections with a bound identity.
    pub authenticated: usize,
}

/// Central real-time hub.
///
/// One instance exists per process, constructed at startup and passed by
/// reference to every component that needs to broadcast. Shutdown stops
/// the heartbeat and asks every connection's writer to close.
pub struct RealtimeHub {
    registry: Arc<ConnectionRegistry>,
    dispatcher: Arc<BroadcastDispatcher>,
    config: RealtimeConfig,
    shutdown_tx: watch::Sender<bool>,
    heartbeat: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for RealtimeHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeHub")
            .field("connections", &self.registry.connection_count())
            .finish()
    }
}

impl RealtimeHub {
    /// Create a hub with an empty registry. The heartbeat is not running
    /// until [`RealtimeHub::start`] is called.
    pub fn new(config: RealtimeConfig) -> Self {
        let registry = Arc::new(ConnectionRegistry::new(config.send_queue_size));
        let dispatcher = Arc::new(BroadcastDispatcher::new(registry.clone()));
        let (shutdown_tx, _) = watch::channel(false);

        Self {
            registry,
            dispatcher,
            config,
            shutdown_tx,
            heartbeat: Mutex::new(None),
        }
    }

    /// Spawn the heartbeat monitor.
    pub fn start(&self) {
        let monitor = HeartbeatMonitor::new(
            self.registry.clone(),
            Duration::from_secs(self.config.ping_interval_seconds),
        );
        let shutdown_rx = self.shutdown_tx.subscribe();
        let handle = tokio::spawn(monitor.run(shutdown_rx));

        let mut guard = self.heartbeat.lock().expect("heartbeat lock poisoned");
        if let Some(previous) = guard.replace(handle) {
            previous.abort();
        }

        info!(
            ping_interval_seconds = self.config.ping_interval_seconds,
            "Real-time hub started"
        );
    }

    /// The connection registry.
    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// The broadcast dispatcher.
    pub fn dispatcher(&self) -> &Arc<BroadcastDispatcher> {
        &self.dispatcher
    }

    /// Process an inbound text frame from a client.
    pub fn handle_inbound(&self, conn_id: &ConnectionId, raw: &str) {
        let msg: InboundMessage = match serde_json::from_str(raw) {
            Ok(msg) => msg,
            Err(e) => {
                warn!(conn_id = %conn_id, error = %e, "Unparseable inbound message");
                self.send_error(conn_id, "INVALID_MESSAGE", &format!("Bad message: {e}"));
                return;
            }
        };

        match msg {
            InboundMessage::Auth {
                user_id,
                department_id,
                subjects,
            } => {
                self.registry.authenticate(
                    conn_id,
                    ClientIdentity {
                        user_id,
                        department_id,
                        subjects: subjects.into_iter().collect(),
                    },
                );
            }
            InboundMessage::Pong => {
                self.registry.mark_alive(conn_id);
            }
        }
    }

    fn send_error(&self, conn_id: &ConnectionId, code: &str, message: &str) {
        if let Some(handle) = self.registry.get(conn_id) {
            if let Ok(payload) = encode_event(
                "error",
                &serde_json::json!({"code": code, "message": message}),
            ) {
                let _ = handle.send_event(payload);
            }
        }
    }

    /// Current hub counters.
    pub fn stats(&self) -> HubStats {
        HubStats {
            connections: self.registry.connection_count(),
            authenticated: self.registry.authenticated_count(),
        }
    }

    /// Stop the heartbeat and close every connection.
    pub async fn shutdown(&self) {
        info!("Shutting down real-time hub");
        let _ = self.shutdown_tx.send(true);

        let handle = self
            .heartbeat
            .lock()
            .expect("heartbeat lock poisoned")
            .take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }

        for conn in self.registry.snapshot() {
            conn.send_close();
            self.registry.unregister(&conn.id);
        }

        info!("Real-time hub shut down");
    }
}

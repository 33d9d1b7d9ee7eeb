//! Two-strike heartbeat sweep over the connection registry.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;
use tracing::debug;

use super::registry::ConnectionRegistry;

/// Periodic liveness sweep.
///
/// Each tick, a connection that failed to answer the *previous* tick's
/// probe is evicted; everyone else gets their liveness flag cleared and a
/// fresh probe. A connection therefore has a full interval to answer
/// before it is dropped. A failed probe send counts the same as a
/// missed pong.
#[derive(Debug)]
pub struct HeartbeatMonitor {
    registry: Arc<ConnectionRegistry>,
    interval: Duration,
}

impl HeartbeatMonitor {
    /// Create a monitor sweeping at the given interval.
    pub fn new(registry: Arc<ConnectionRegistry>, interval: Duration) -> Self {
        Self { registry, interval }
    }

    /// Run until the shutdown signal flips to `true`.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = time::interval(self.interval);
        // The immediate first tick only primes the probes.
        loop {
            tokio::select! {
                _ = ticker.tick() => self.sweep(),
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        debug!("Heartbeat monitor stopped");
    }

    /// One pass over a registry snapshot.
    fn sweep(&self) {
        for conn in self.registry.snapshot() {
            if !conn.is_open() || !conn.is_alive() {
                debug!(conn_id = %conn.id, "Evicting unresponsive connection");
                conn.send_close();
                self.registry.unregister(&conn.id);
                continue;
            }

            conn.mark_pending_ping();
            if !conn.send_ping() {
                // Left pending; picked up by the next sweep.
                debug!(conn_id = %conn.id, "Ping enqueue failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::types::OutboundFrame;

    #[tokio::test]
    async fn test_unresponsive_connection_evicted_after_two_ticks() {
        let registry = Arc::new(ConnectionRegistry::new(8));
        let (handle, mut rx) = registry.register();

        let monitor = HeartbeatMonitor::new(registry.clone(), Duration::from_millis(40));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(monitor.run(shutdown_rx));

        // First sweep sends a probe; second sweep finds it unanswered.
        time::sleep(Duration::from_millis(110)).await;
        assert_eq!(registry.connection_count(), 0);
        assert!(!handle.is_open());

        // The writer was asked to close after receiving the probe.
        let mut saw_ping = false;
        let mut saw_close = false;
        while let Ok(frame) = rx.try_recv() {
            match frame {
                OutboundFrame::Ping => saw_ping = true,
                OutboundFrame::Close => saw_close = true,
                OutboundFrame::Event(_) => {}
            }
        }
        assert!(saw_ping);
        assert!(saw_close);

        let _ = shutdown_tx.send(true);
        let _ = task.await;
    }

    #[tokio::test]
    async fn test_responsive_connection_survives() {
        let registry = Arc::new(ConnectionRegistry::new(8));
        let (handle, mut rx) = registry.register();

        let monitor = HeartbeatMonitor::new(registry.clone(), Duration::from_millis(40));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(monitor.run(shutdown_rx));

        // Answer every probe, as the peer's pong handler would.
        let registry_for_pong = registry.clone();
        let conn_id = handle.id;
        let ponger = tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Some(OutboundFrame::Ping) => registry_for_pong.mark_alive(&conn_id),
                    Some(_) => {}
                    None => break,
                }
            }
        });

        time::sleep(Duration::from_millis(150)).await;
        assert_eq!(registry.connection_count(), 1);
        assert!(handle.is_open());

        let _ = shutdown_tx.send(true);
        let _ = task.await;
        ponger.abort();
    }
}

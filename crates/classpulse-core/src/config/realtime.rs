//! Real-time WebSocket engine configuration.

use serde::{Deserialize, Serialize};

/// Real-time (WebSocket) engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Heartbeat sweep interval in seconds.
    #[serde(default = "default_ping_interval")]
    pub ping_interval_seconds: u64,
    /// Per-connection outbound queue capacity. A connection whose queue
    /// overflows is treated as unhealthy and evicted by the next sweep.
    #[serde(default = "default_send_queue")]
    pub send_queue_size: usize,
    /// Default poll timer duration in seconds.
    #[serde(default = "default_poll_timer")]
    pub default_poll_timer_seconds: u64,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            ping_interval_seconds: default_ping_interval(),
            send_queue_size: default_send_queue(),
            default_poll_timer_seconds: default_poll_timer(),
        }
    }
}

fn default_ping_interval() -> u64 {
    30
}

fn default_send_queue() -> usize {
    256
}

fn default_poll_timer() -> u64 {
    30
}

//! Connection tracking: handles, registry, and heartbeat liveness.

pub mod handle;
pub mod heartbeat;
pub mod registry;

pub use handle::{ClientIdentity, ConnectionHandle, ConnectionId};
pub use heartbeat::HeartbeatMonitor;
pub use registry::ConnectionRegistry;

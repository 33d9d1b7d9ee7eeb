//! # classpulse-realtime
//!
//! Real-time WebSocket engine for ClassPulse. Provides:
//!
//! - Connection registry with late (in-band) identity binding
//! - Two-strike heartbeat liveness sweep
//! - Best-effort filtered broadcast fan-out
//! - Hub lifecycle (startup / graceful shutdown)
//!
//! The engine never persists anything; it only routes events produced by
//! the poll and note services to the right subset of live connections.

pub mod connection;
pub mod dispatch;
pub mod hub;
pub mod message;

pub use connection::handle::{ClientIdentity, ConnectionHandle, ConnectionId};
pub use connection::registry::ConnectionRegistry;
pub use dispatch::{BroadcastDispatcher, BroadcastFilter};
pub use hub::RealtimeHub;
pub use message::types::{InboundMessage, OutboundFrame};

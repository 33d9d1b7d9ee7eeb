//! Wire message type definitions and envelope encoding.

pub mod types;

pub use types::{encode_event, InboundMessage, OutboundFrame};

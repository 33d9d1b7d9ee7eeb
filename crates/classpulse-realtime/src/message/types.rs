//! Inbound and outbound WebSocket message type definitions.

use serde::{Deserialize, Serialize};

use classpulse_core::result::AppResult;

/// Messages sent by the client to the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InboundMessage {
    /// Bind identity and routing metadata to the connection. May be sent
    /// again; a repeat simply overwrites the previous binding.
    Auth {
        /// Authenticated user id.
        #[serde(rename = "userId")]
        user_id: i64,
        /// Department for department-scoped delivery.
        #[serde(rename = "departmentId", default)]
        department_id: Option<i64>,
        /// Subscribed subjects for subject-scoped delivery.
        #[serde(default)]
        subjects: Vec<String>,
    },
    /// Application-level pong answering a heartbeat probe.
    Pong,
}

/// Frames queued for a connection's dedicated writer task.
///
/// The writer translates these into transport messages; everything else
/// in the engine only ever enqueues.
#[derive(Debug, Clone)]
pub enum OutboundFrame {
    /// A serialized `{"type": ..., "data": ...}` event.
    Event(String),
    /// Transport-level heartbeat probe.
    Ping,
    /// Ask the writer to close the connection.
    Close,
}

/// Event envelope: every server-originated message is one JSON object of
/// this shape.
#[derive(Debug, Serialize)]
struct Envelope<'a> {
    #[serde(rename = "type")]
    event_type: &'a str,
    data: &'a serde_json::Value,
}

/// Serialize an event envelope once, for delivery to any number of
/// connections.
pub fn encode_event(event_type: &str, data: &serde_json::Value) -> AppResult<String> {
    Ok(serde_json::to_string(&Envelope { event_type, data })?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_message_shape() {
        let msg: InboundMessage = serde_json::from_str(
            r#"{"type":"auth","userId":7,"departmentId":3,"subjects":["Math","Physics"]}"#,
        )
        .unwrap();
        match msg {
            InboundMessage::Auth {
                user_id,
                department_id,
                subjects,
            } => {
                assert_eq!(user_id, 7);
                assert_eq!(department_id, Some(3));
                assert_eq!(subjects, vec!["Math", "Physics"]);
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_auth_message_optional_fields() {
        let msg: InboundMessage =
            serde_json::from_str(r#"{"type":"auth","userId":1}"#).unwrap();
        match msg {
            InboundMessage::Auth {
                department_id,
                subjects,
                ..
            } => {
                assert_eq!(department_id, None);
                assert!(subjects.is_empty());
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_envelope_shape() {
        let encoded = encode_event("poll:created", &serde_json::json!({"id": 1})).unwrap();
        let value: serde_json::Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(value["type"], "poll:created");
        assert_eq!(value["data"]["id"], 1);
    }
}

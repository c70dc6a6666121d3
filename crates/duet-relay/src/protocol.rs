//! Wire protocol. Each event is one JSON text frame tagged by `type`.
//! Payloads are opaque JSON values; the relay only reads the envelope.

use duet_common::{ConnectionId, DuetError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Events a participant sends to the relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientEvent {
    Offer { payload: Value, target: ConnectionId },
    Answer { payload: Value, target: ConnectionId },
    IceCandidate { payload: Value, target: ConnectionId },
}

impl ClientEvent {
    /// Decode one inbound text frame.
    pub fn parse(frame: &str) -> Result<Self, DuetError> {
        Ok(serde_json::from_str(frame)?)
    }
}

/// Events the relay sends to a participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// A second participant joined; `id` is how to address it.
    OtherUser { id: ConnectionId },
    Offer { payload: Value, sender: ConnectionId },
    Answer { payload: Value },
    IceCandidate { payload: Value },
}

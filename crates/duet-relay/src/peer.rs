//! Relay-side handle to one participant's connection.

use duet_common::ConnectionId;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::protocol::ServerEvent;

/// A connected participant: its id plus the sending half of the queue its
/// writer task drains into the WebSocket.
#[derive(Debug, Clone)]
pub struct Peer {
    id: ConnectionId,
    tx: mpsc::Sender<String>,
}

impl Peer {
    pub fn new(id: ConnectionId, tx: mpsc::Sender<String>) -> Self {
        Self { id, tx }
    }

    pub fn id(&self) -> &ConnectionId {
        &self.id
    }

    /// Queue an event for delivery without waiting. Returns whether it was
    /// queued; a full or closed queue drops the event.
    pub fn send(&self, event: &ServerEvent) -> bool {
        let json = match serde_json::to_string(event) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(conn = %self.id, error = %e, "Failed to encode event");
                return false;
            }
        };

        match self.tx.try_send(json) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::warn!(conn = %self.id, "Outbound queue full, dropping event");
                false
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!(conn = %self.id, "Outbound queue closed");
                false
            }
        }
    }
}

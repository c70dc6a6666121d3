//! Relay operations: pairing on connect, unicast forwarding, removal on
//! disconnect. The relay never inspects payloads.

use duet_common::ConnectionId;

use crate::peer::Peer;
use crate::protocol::{ClientEvent, ServerEvent};
use crate::registry::Registry;

/// The signaling relay. Cheap to clone; clones share one registry.
#[derive(Clone, Default)]
pub struct Relay {
    registry: Registry,
}

impl Relay {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    /// Register a new connection. When it brings the registry to exactly two
    /// entries, the participant already present learns the newcomer's id.
    pub async fn on_connect(&self, peer: Peer) {
        let id = peer.id().clone();
        if let Some(first) = self.registry.insert(peer).await {
            tracing::info!(conn = %first.id(), other = %id, "Notifying of other user");
            first.send(&ServerEvent::OtherUser { id });
        }
    }

    pub async fn on_offer(
        &self,
        sender: &ConnectionId,
        payload: serde_json::Value,
        target: &ConnectionId,
    ) {
        let event = ServerEvent::Offer {
            payload,
            sender: sender.clone(),
        };
        self.forward(sender, target, event).await;
    }

    pub async fn on_answer(
        &self,
        sender: &ConnectionId,
        payload: serde_json::Value,
        target: &ConnectionId,
    ) {
        self.forward(sender, target, ServerEvent::Answer { payload }).await;
    }

    pub async fn on_candidate(
        &self,
        sender: &ConnectionId,
        payload: serde_json::Value,
        target: &ConnectionId,
    ) {
        self.forward(sender, target, ServerEvent::IceCandidate { payload })
            .await;
    }

    /// Remove a connection. The other participant is not told.
    pub async fn on_disconnect(&self, id: &ConnectionId) {
        self.registry.remove(id).await;
    }

    /// Decode a text frame from `sender` and route it. Undecodable frames
    /// are logged and ignored.
    pub async fn dispatch(&self, sender: &ConnectionId, frame: &str) {
        match ClientEvent::parse(frame) {
            Ok(ClientEvent::Offer { payload, target }) => {
                self.on_offer(sender, payload, &target).await
            }
            Ok(ClientEvent::Answer { payload, target }) => {
                self.on_answer(sender, payload, &target).await
            }
            Ok(ClientEvent::IceCandidate { payload, target }) => {
                self.on_candidate(sender, payload, &target).await
            }
            Err(e) => {
                tracing::warn!(conn = %sender, error = %e, "Ignoring malformed frame");
            }
        }
    }

    pub async fn connection_count(&self) -> usize {
        self.registry.len().await
    }

    async fn forward(&self, sender: &ConnectionId, target: &ConnectionId, event: ServerEvent) {
        if sender == target {
            tracing::debug!(conn = %sender, "Self-addressed message, dropping");
            return;
        }
        match self.registry.get(target).await {
            Some(peer) => {
                peer.send(&event);
            }
            None => {
                tracing::debug!(conn = %sender, target = %target, "Unknown target, dropping");
            }
        }
    }
}

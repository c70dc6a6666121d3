//! Registry: maps connection ids to live peers.

use std::collections::HashMap;
use std::sync::Arc;

use duet_common::ConnectionId;
use tokio::sync::RwLock;

use crate::peer::Peer;

/// Thread-safe registry of open connections.
#[derive(Clone, Default)]
pub struct Registry {
    peers: Arc<RwLock<HashMap<ConnectionId, Peer>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a peer. If the registry now holds exactly two entries, returns
    /// the one that was already present.
    pub async fn insert(&self, peer: Peer) -> Option<Peer> {
        let mut map = self.peers.write().await;
        let id = peer.id().clone();
        map.insert(id.clone(), peer);

        if map.len() != 2 {
            return None;
        }
        map.values().find(|p| *p.id() != id).cloned()
    }

    /// Look up a peer for forwarding.
    pub async fn get(&self, id: &ConnectionId) -> Option<Peer> {
        self.peers.read().await.get(id).cloned()
    }

    /// Remove a peer. Returns true if it was present.
    pub async fn remove(&self, id: &ConnectionId) -> bool {
        self.peers.write().await.remove(id).is_some()
    }

    /// Number of open connections.
    pub async fn len(&self) -> usize {
        self.peers.read().await.len()
    }
}

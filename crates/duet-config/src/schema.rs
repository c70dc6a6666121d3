//! Configuration schema types for the relay.
//!
//! All structs use `serde(default)` so partial configs work correctly.

use serde::{Deserialize, Serialize};

/// Root configuration for the relay.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    pub server: ServerConfig,
    pub cors: CorsConfig,
}

/// Listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Capacity of each connection's outbound message queue.
    pub outbound_queue: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            outbound_queue: 256,
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Cross-origin policy applied once, at WebSocket handshake.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Origin browsers may connect from, or `*` for any.
    pub allowed_origin: String,
    /// HTTP methods accepted on the handshake request.
    pub allowed_methods: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origin: "http://localhost:5173".into(),
            allowed_methods: vec!["GET".into(), "POST".into()],
        }
    }
}

//! duet-relay: WebSocket signaling relay for two-party WebRTC calls.
//!
//! Accepts WebSocket connections, tells the first participant when a second
//! one arrives, and forwards offer/answer/candidate messages between them by
//! connection id. Payloads are relayed untouched; media never passes through.

mod connection;
mod origin;
mod peer;
mod protocol;
mod registry;
mod relay;
mod server;

use std::path::PathBuf;

use clap::Parser;
use duet_common::DuetError;
use duet_config::RelayConfig;
use tokio::net::TcpListener;

use crate::origin::OriginPolicy;
use crate::registry::Registry;
use crate::relay::Relay;

#[derive(Parser)]
#[command(name = "duet-relay", about = "WebSocket signaling relay for two-party WebRTC")]
struct Args {
    /// Path to a TOML config file (defaults to the platform config dir).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind, overriding the config file.
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on, overriding the config file.
    #[arg(short, long)]
    port: Option<u16>,

    /// Browser origin allowed to connect, or "*" for any.
    #[arg(long)]
    allowed_origin: Option<String>,
}

impl Args {
    fn apply(&self, config: &mut RelayConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(origin) = &self.allowed_origin {
            config.cors.allowed_origin = origin.clone();
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), DuetError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "duet_relay=info".into()),
        )
        .init();

    let args = Args::parse();

    let mut config = match duet_config::load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) if args.config.is_some() => return Err(e.into()),
        Err(e) => {
            tracing::warn!(error = %e, "Using default config");
            RelayConfig::default()
        }
    };
    args.apply(&mut config);
    duet_config::validation::validate(&config)?;

    let addr = config.server.bind_addr();
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!(
        allowed_origin = %config.cors.allowed_origin,
        "duet-relay listening on {}",
        addr
    );

    let relay = Relay::new(Registry::new());
    let policy = OriginPolicy::new(&config.cors);
    server::serve(listener, relay, policy, config.server.outbound_queue).await;

    Ok(())
}

//! Per-connection handler: register, pump frames both ways, unregister.

use std::net::SocketAddr;

use duet_common::ConnectionId;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

use crate::peer::Peer;
use crate::relay::Relay;

/// Handle a single WebSocket connection until it closes.
pub async fn handle_connection(
    ws: tokio_tungstenite::WebSocketStream<tokio::net::TcpStream>,
    addr: SocketAddr,
    relay: Relay,
    outbound_queue: usize,
) {
    let (mut sink, mut stream) = ws.split();

    // 1. Assign an id and register.
    let id = ConnectionId::new();
    let (tx, mut rx) = mpsc::channel::<String>(outbound_queue);
    relay.on_connect(Peer::new(id.clone(), tx)).await;

    let connections = relay.connection_count().await;
    tracing::info!(peer = %addr, conn = %id, connections, "Client connected");

    // 2. Forwarding loop.
    loop {
        tokio::select! {
            // Events queued by the relay → this client's WebSocket
            Some(msg) = rx.recv() => {
                if sink.send(Message::Text(msg.into())).await.is_err() {
                    break;
                }
            }

            // Frames from this client → relay
            frame = stream.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        relay.dispatch(&id, &text).await;
                    }
                    Some(Ok(Message::Binary(_))) => {
                        tracing::debug!(conn = %id, "Ignoring binary frame");
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!(peer = %addr, conn = %id, error = %e, "WS error");
                        break;
                    }
                    // Pings are answered by tungstenite itself.
                    _ => {}
                }
            }
        }
    }

    // 3. Cleanup.
    relay.on_disconnect(&id).await;

    let connections = relay.connection_count().await;
    tracing::info!(peer = %addr, conn = %id, connections, "Client disconnected");
}

//! Accept loop: TCP accept, origin-checked WebSocket handshake, then one
//! task per connection.

use tokio::net::TcpListener;
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::handshake::server::{Request, Response};

use crate::connection::handle_connection;
use crate::origin::OriginPolicy;
use crate::relay::Relay;

pub async fn serve(
    listener: TcpListener,
    relay: Relay,
    policy: OriginPolicy,
    outbound_queue: usize,
) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let relay = relay.clone();
                let policy = policy.clone();
                tokio::spawn(async move {
                    let callback = |req: &Request, resp: Response| policy.check(req, resp);
                    match accept_hdr_async(stream, callback).await {
                        Ok(ws) => handle_connection(ws, addr, relay, outbound_queue).await,
                        Err(e) => {
                            tracing::warn!(peer = %addr, error = %e, "WS handshake failed");
                        }
                    }
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "TCP accept error");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::time::Duration;

    use duet_config::CorsConfig;
    use futures_util::{SinkExt, StreamExt};
    use serde_json::{json, Value};
    use tokio::net::TcpStream;
    use tokio_tungstenite::tungstenite::client::IntoClientRequest;
    use tokio_tungstenite::tungstenite::http::{HeaderValue, StatusCode};
    use tokio_tungstenite::tungstenite::{Error, Message};
    use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

    use super::*;

    type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

    async fn start() -> (SocketAddr, Relay) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let relay = Relay::default();
        let policy = OriginPolicy::new(&CorsConfig::default());
        tokio::spawn(serve(listener, relay.clone(), policy, 16));
        (addr, relay)
    }

    async fn wait_for_count(relay: &Relay, expected: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while relay.connection_count().await != expected {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("registry never reached expected size");
    }

    async fn join(addr: SocketAddr, relay: &Relay, expected: usize) -> Client {
        let (ws, _) = connect_async(format!("ws://{addr}")).await.unwrap();
        wait_for_count(relay, expected).await;
        ws
    }

    async fn recv_event(ws: &mut Client) -> Value {
        loop {
            let frame = tokio::time::timeout(Duration::from_secs(5), ws.next())
                .await
                .expect("timed out waiting for event")
                .unwrap()
                .unwrap();
            if let Message::Text(text) = frame {
                return serde_json::from_str(&text).unwrap();
            }
        }
    }

    async fn send_event(ws: &mut Client, event: Value) {
        ws.send(Message::Text(event.to_string().into())).await.unwrap();
    }

    #[tokio::test]
    async fn pairs_and_relays_over_websocket() {
        let (addr, relay) = start().await;

        let mut a = join(addr, &relay, 1).await;
        let mut b = join(addr, &relay, 2).await;

        let other = recv_event(&mut a).await;
        assert_eq!(other["type"], "other-user");
        let b_id = other["id"].as_str().unwrap().to_string();

        let sdp = json!({"type": "offer", "sdp": "v=0"});
        send_event(&mut a, json!({"type": "offer", "payload": sdp, "target": b_id})).await;

        let offer = recv_event(&mut b).await;
        assert_eq!(offer["type"], "offer");
        assert_eq!(offer["payload"], sdp);
        let a_id = offer["sender"].as_str().unwrap().to_string();
        assert_ne!(a_id, b_id);

        send_event(&mut b, json!({"type": "answer", "payload": "Y", "target": a_id})).await;
        assert_eq!(
            recv_event(&mut a).await,
            json!({"type": "answer", "payload": "Y"})
        );
    }

    #[tokio::test]
    async fn malformed_frame_keeps_connection_open() {
        let (addr, relay) = start().await;

        let mut a = join(addr, &relay, 1).await;
        let mut b = join(addr, &relay, 2).await;
        let b_id = recv_event(&mut a).await["id"].as_str().unwrap().to_string();

        a.send(Message::Text("garbage".into())).await.unwrap();
        send_event(
            &mut a,
            json!({"type": "ice-candidate", "payload": {"candidate": "c1"}, "target": b_id}),
        )
        .await;

        assert_eq!(
            recv_event(&mut b).await,
            json!({"type": "ice-candidate", "payload": {"candidate": "c1"}})
        );
        assert_eq!(relay.connection_count().await, 2);
    }

    #[tokio::test]
    async fn ping_gets_a_single_pong() {
        let (addr, relay) = start().await;

        let mut a = join(addr, &relay, 1).await;
        let mut b = join(addr, &relay, 2).await;
        let b_id = recv_event(&mut a).await["id"].as_str().unwrap().to_string();

        a.send(Message::Ping(b"keepalive".to_vec().into())).await.unwrap();
        let first = tokio::time::timeout(Duration::from_secs(5), a.next())
            .await
            .expect("timed out waiting for pong")
            .unwrap()
            .unwrap();
        assert!(matches!(first, Message::Pong(_)));

        send_event(&mut a, json!({"type": "offer", "payload": "X", "target": b_id})).await;
        let a_id = recv_event(&mut b).await["sender"].as_str().unwrap().to_string();
        send_event(&mut b, json!({"type": "answer", "payload": "Y", "target": a_id})).await;

        let next = tokio::time::timeout(Duration::from_secs(5), a.next())
            .await
            .expect("timed out waiting for answer")
            .unwrap()
            .unwrap();
        match next {
            Message::Text(text) => {
                let event: Value = serde_json::from_str(&text).unwrap();
                assert_eq!(event, json!({"type": "answer", "payload": "Y"}));
            }
            other => panic!("expected the answer, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn close_removes_connection() {
        let (addr, relay) = start().await;

        let mut a = join(addr, &relay, 1).await;
        let _b = join(addr, &relay, 2).await;

        a.close(None).await.unwrap();
        wait_for_count(&relay, 1).await;
    }

    #[tokio::test]
    async fn foreign_origin_is_refused() {
        let (addr, relay) = start().await;

        let mut request = format!("ws://{addr}").into_client_request().unwrap();
        request
            .headers_mut()
            .insert("Origin", HeaderValue::from_static("http://evil.example"));

        match connect_async(request).await {
            Err(Error::Http(response)) => assert_eq!(response.status(), StatusCode::FORBIDDEN),
            Err(e) => panic!("expected 403, got {e}"),
            Ok(_) => panic!("handshake with foreign origin succeeded"),
        }
        assert_eq!(relay.connection_count().await, 0);
    }

    #[tokio::test]
    async fn configured_origin_is_accepted() {
        let (addr, relay) = start().await;

        let mut request = format!("ws://{addr}").into_client_request().unwrap();
        request
            .headers_mut()
            .insert("Origin", HeaderValue::from_static("http://localhost:5173"));

        let (_ws, _) = connect_async(request).await.unwrap();
        wait_for_count(&relay, 1).await;
    }
}

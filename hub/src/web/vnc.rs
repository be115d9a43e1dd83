//! WebSocket bridge to registered VNC endpoints
//!
//! Browser VNC clients speak RFB over WebSocket frames (websockify style).
//! `/ws/vnc/{id}` looks up the registered remote session and copies bytes
//! both ways between the socket and the session's TCP endpoint.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::{IntoResponse, Response},
};
use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use super::state::AppState;
use crate::remote::RemoteSession;

/// Upgrade handler for `/ws/vnc/{id}`
pub async fn vnc_handler(
    ws: WebSocketUpgrade,
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Response {
    let session = match state.remote.get(&id) {
        Ok(session) => session,
        Err(e) => return e.into_response(),
    };

    ws.on_upgrade(move |socket| bridge(socket, session))
}

/// Copy bytes between the WebSocket and the session's TCP endpoint until
/// either side closes
async fn bridge(mut socket: WebSocket, session: RemoteSession) {
    let addr = format!("{}:{}", session.host, session.port);

    let stream = match TcpStream::connect(&addr).await {
        Ok(stream) => stream,
        Err(e) => {
            tracing::warn!("vnc bridge to {} failed: {}", addr, e);
            let body = serde_json::json!({
                "error": "upstream_unreachable",
                "message": e.to_string(),
            });
            let _ = socket.send(Message::Text(body.to_string().into())).await;
            return;
        }
    };

    tracing::info!("vnc bridge open: session {} -> {}", session.id, addr);

    let (mut ws_tx, mut ws_rx) = socket.split();
    let (mut tcp_rx, mut tcp_tx) = stream.into_split();

    let client_to_tcp = async {
        while let Some(message) = ws_rx.next().await {
            match message {
                Ok(Message::Binary(data)) => {
                    if tcp_tx.write_all(&data).await.is_err() {
                        break;
                    }
                }
                Ok(Message::Close(_)) | Err(_) => break,
                // Text/ping/pong frames carry no RFB payload
                Ok(_) => {}
            }
        }
    };

    let tcp_to_client = async {
        let mut buf = [0u8; 8192];
        loop {
            match tcp_rx.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    if ws_tx
                        .send(Message::Binary(buf[..n].to_vec().into()))
                        .await
                        .is_err()
                    {
                        break;
                    }
                }
            }
        }
    };

    tokio::select! {
        _ = client_to_tcp => {}
        _ = tcp_to_client => {}
    }

    tracing::info!("vnc bridge closed: session {}", session.id);
}

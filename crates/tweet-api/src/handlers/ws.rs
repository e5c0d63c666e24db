//! WebSocket upgrade handler and per-connection session.

use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tracing::{debug, warn};

use crate::extractors::PeerAddr;
use crate::state::NotifierState;

/// How long a finished session waits for its writer to flush the close frame.
const WRITER_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// GET {notifier.path}: WebSocket upgrade
pub async fn ws_upgrade(
    State(state): State<NotifierState>,
    PeerAddr(remote_addr): PeerAddr,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| run_session(state, socket, remote_addr))
}

/// Serves one connection from upgrade until close.
///
/// The connection is in the registry for exactly as long as this routine
/// runs. A separate writer task drains the outbound buffer; the read loop
/// forwards client frames to the broadcast queue and watches for closure.
async fn run_session(state: NotifierState, socket: WebSocket, remote_addr: Option<SocketAddr>) {
    let connections = state.engine.connections.clone();
    let (handle, mut outbound_rx) = connections.register(remote_addr);
    let conn_id = handle.id;

    let (mut ws_tx, mut ws_rx) = socket.split();

    let writer_handle = handle.clone();
    let writer = tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                _ = writer_handle.closed() => {
                    let _ = ws_tx.send(Message::Close(None)).await;
                    break;
                }
                next = outbound_rx.recv() => match next {
                    Some(payload) => {
                        if let Err(e) = ws_tx.send(Message::Text(payload.into())).await {
                            debug!(conn_id = %writer_handle.id, error = %e, "Socket write failed");
                            writer_handle.close();
                            break;
                        }
                    }
                    None => break,
                },
            }
        }
    });

    loop {
        tokio::select! {
            _ = handle.closed() => break,
            frame = ws_rx.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    connections.handle_inbound(&conn_id, text.as_str().to_owned()).await;
                }
                Some(Ok(Message::Binary(data))) => match String::from_utf8(data.to_vec()) {
                    Ok(text) => connections.handle_inbound(&conn_id, text).await,
                    Err(_) => warn!(conn_id = %conn_id, len = data.len(), "Dropping non UTF-8 binary frame"),
                },
                Some(Ok(Message::Close(_))) | None => break,
                // ping/pong
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    debug!(conn_id = %conn_id, error = %e, "WebSocket read error");
                    break;
                }
            },
        }
    }

    connections.unregister(&conn_id);
    handle.close();

    if tokio::time::timeout(WRITER_DRAIN_TIMEOUT, writer).await.is_err() {
        warn!(conn_id = %conn_id, "Writer did not finish in time");
    }
}

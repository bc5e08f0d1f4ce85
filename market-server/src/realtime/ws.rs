//! Chat WebSocket endpoint
//!
//! GET /socket
//!
//! 协议: JSON text frames `{"event": ..., "data": ...}`
//! - Client → Server: [`ClientEvent`] (register, sendMessage, selectAdmin)
//! - Server → Client: [`ServerEvent`]
//!
//! The session pumps two directions in one `select!` loop: frames from the
//! socket are dispatched to the hub, events from the connection outbox are
//! written to the socket. A close frame or a failed write ends the session
//! and releases the connection's rooms.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use shared::{AppError, ClientEvent, ErrorCode, ServerEvent};
use tokio::time::Duration;

use crate::core::ServerState;

const PING_INTERVAL: Duration = Duration::from_secs(30);

/// GET /socket
pub async fn handle_socket(State(state): State<ServerState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| socket_session(socket, state))
}

async fn socket_session(socket: WebSocket, state: ServerState) {
    let hub = state.hub.clone();
    let (mut sink, mut stream) = socket.split();
    let (conn, mut outbox) = hub.connect();

    let mut ping_interval = tokio::time::interval(PING_INTERVAL);
    ping_interval.tick().await; // skip immediate

    loop {
        tokio::select! {
            _ = ping_interval.tick() => {
                if sink.send(Message::Ping(vec![].into())).await.is_err() {
                    break;
                }
            }

            event = outbox.recv() => {
                match event {
                    Some(event) => {
                        if send_event(&mut sink, &event).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }

            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ClientEvent>(&text) {
                            Ok(event) => hub.handle(conn, event).await,
                            Err(e) => {
                                let err = AppError::with_message(
                                    ErrorCode::InvalidFormat,
                                    format!("Unrecognized event: {e}"),
                                );
                                hub.reject(conn, &err);
                            }
                        }
                    }
                    Some(Ok(Message::Pong(_))) | Some(Ok(Message::Ping(_))) => {}
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!(conn, error = %e, "WebSocket read failed");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    hub.disconnect(conn);
}

async fn send_event<S>(sink: &mut S, event: &ServerEvent) -> Result<(), ()>
where
    S: futures::Sink<Message, Error = axum::Error> + Unpin,
{
    let json = serde_json::to_string(event).map_err(|_| ())?;
    sink.send(Message::Text(json.into())).await.map_err(|_| ())
}

//! WebSocket connection handler.
//!
//! One handler per accepted connection. It owns the connection's
//! `SessionState`, decodes one command per text frame and passes it to the
//! Router. Everything sent to the peer, replies and relayed messages alike,
//! goes through the connection's outbound channel and a single writer task.

use std::{net::SocketAddr, ops::ControlFlow, sync::Arc, time::Duration};

use axum::{
    extract::{
        ConnectInfo, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc::{self, UnboundedSender};

use crate::{
    domain::{Command, ConnectionHandle, DecodeError, EXIT_SENTINEL, Reply, SessionState},
    ui::state::AppState,
};

/// How long queued frames may take to flush after the receive loop ends
const WRITER_DRAIN_TIMEOUT: Duration = Duration::from_secs(1);

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, peer))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, peer: SocketAddr) {
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let handle = state.connections.open(tx.clone()).await;
    tracing::info!("Connection {} opened from {}", handle, peer);

    let (mut sender, mut receiver) = socket.split();

    // Writer: drains the outbound channel until every sender is gone
    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                return;
            }
        }
        let _ = sender.close().await;
    });

    let mut session = SessionState::new();
    let mut writer_done = false;

    loop {
        let next = tokio::select! {
            next = receiver.next() => next,
            _ = &mut send_task => {
                tracing::info!("Writer for {} stopped", handle);
                writer_done = true;
                break;
            }
        };

        let message = match next {
            Some(Ok(message)) => message,
            Some(Err(e)) => {
                tracing::warn!("Read error on {}: {}", handle, e);
                break;
            }
            None => {
                tracing::info!("Connection {} reached end of stream", handle);
                break;
            }
        };

        match message {
            Message::Text(text) => {
                let text = text.as_str().trim_end_matches(['\r', '\n']);
                if text == EXIT_SENTINEL {
                    tracing::info!("Connection {} sent the exit sentinel", handle);
                    break;
                }
                if handle_text(&state, handle, &mut session, &tx, text)
                    .await
                    .is_break()
                {
                    break;
                }
            }
            Message::Binary(bytes) => {
                tracing::warn!("Ignoring {}-byte binary frame from {}", bytes.len(), handle);
            }
            Message::Close(_) => {
                tracing::info!("Connection {} requested close", handle);
                break;
            }
            Message::Ping(_) | Message::Pong(_) => {
                tracing::debug!("Received ping/pong from {}", handle);
            }
        }
    }

    let summary = state.router.disconnect(handle, &session).await;
    tracing::info!(
        "Connection {} from {} closed after {}ms (name released: {}, groups left: {})",
        handle,
        peer,
        summary.connected_for_ms.unwrap_or_default(),
        summary.released_name,
        summary.groups_left
    );

    drop(tx);
    if !writer_done && tokio::time::timeout(WRITER_DRAIN_TIMEOUT, &mut send_task).await.is_err() {
        send_task.abort();
    }
}

/// Decode and dispatch one text frame.
///
/// Breaks when the connection must end: its own writer is gone, or a
/// collaborator failed and the server has been told to stop.
async fn handle_text(
    state: &AppState,
    handle: ConnectionHandle,
    session: &mut SessionState,
    tx: &UnboundedSender<String>,
    text: &str,
) -> ControlFlow<()> {
    let command = match Command::decode(text) {
        Ok(command) => command,
        Err(DecodeError::UnknownCommand(preview)) => {
            tracing::debug!("Ignoring unknown command from {}: {}", handle, preview);
            return ControlFlow::Continue(());
        }
        Err(e) => {
            tracing::warn!("Malformed command from {}: {}", handle, e);
            return match Reply::for_malformed(&e) {
                Some(reply) => send_reply(tx, reply),
                None => ControlFlow::Continue(()),
            };
        }
    };
    tracing::debug!("{} <- {}", handle, command);

    match state.router.dispatch(handle, session, command).await {
        Ok(Some(reply)) => send_reply(tx, reply),
        Ok(None) => ControlFlow::Continue(()),
        Err(e) => {
            tracing::error!("Stopping server after failure on {}: {}", handle, e);
            state.report_fatal(e.to_string());
            ControlFlow::Break(())
        }
    }
}

/// Queue a reply behind any frames already waiting for this connection.
fn send_reply(tx: &UnboundedSender<String>, reply: Reply) -> ControlFlow<()> {
    match tx.send(reply.to_string()) {
        Ok(()) => ControlFlow::Continue(()),
        Err(_) => ControlFlow::Break(()),
    }
}

//! Live connections keyed by `ConnectionHandle`.

use std::collections::HashMap;

use parlor_shared::time::get_jst_timestamp;
use thiserror::Error;
use tokio::sync::{Mutex, mpsc::UnboundedSender};

use crate::domain::{ConnectionHandle, ConnectionHandleFactory};

/// Frame delivery failure
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// The handle was closed, or its writer has gone away
    #[error("connection {0} is closed")]
    ConnectionClosed(ConnectionHandle),
}

/// Client connection information
#[derive(Debug, Clone)]
pub struct ConnectionInfo {
    /// Outbound frame channel, drained by the connection's writer task
    pub sender: UnboundedSender<String>,
    /// Unix timestamp when connected (milliseconds)
    pub connected_at: i64,
}

/// Registry of open connections.
///
/// A handle is inserted by `open` when a connection is accepted and removed
/// by `close` when its handler ends. It is the only path for delivering
/// frames to a connection.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: Mutex<HashMap<ConnectionHandle, ConnectionInfo>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new connection and mint its handle.
    pub async fn open(&self, sender: UnboundedSender<String>) -> ConnectionHandle {
        let handle = ConnectionHandleFactory::generate();
        let info = ConnectionInfo {
            sender,
            connected_at: get_jst_timestamp(),
        };
        self.connections.lock().await.insert(handle, info);
        handle
    }

    /// Forget a connection. Later deliveries to `handle` fail softly.
    pub async fn close(&self, handle: ConnectionHandle) -> Option<ConnectionInfo> {
        self.connections.lock().await.remove(&handle)
    }

    /// Queue `frame` on the connection's outbound channel.
    ///
    /// The sender is cloned out and the lock released before enqueueing.
    pub async fn deliver(
        &self,
        handle: ConnectionHandle,
        frame: String,
    ) -> Result<(), DeliveryError> {
        let sender = {
            let connections = self.connections.lock().await;
            connections
                .get(&handle)
                .map(|info| info.sender.clone())
                .ok_or(DeliveryError::ConnectionClosed(handle))?
        };
        sender
            .send(frame)
            .map_err(|_| DeliveryError::ConnectionClosed(handle))
    }

    pub async fn len(&self) -> usize {
        self.connections.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.connections.lock().await.is_empty()
    }
}

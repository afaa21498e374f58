//! Login name -> owning connection.

use std::collections::HashMap;

use tokio::sync::Mutex;

use crate::domain::{ConnectionHandle, LoginName};

/// Who is online and which connection owns them.
///
/// The last login under a name wins.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<LoginName, ConnectionHandle>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate `name` with `handle`, returning the replaced handle.
    pub async fn set(&self, name: LoginName, handle: ConnectionHandle) -> Option<ConnectionHandle> {
        self.sessions.lock().await.insert(name, handle)
    }

    pub async fn get(&self, name: &LoginName) -> Option<ConnectionHandle> {
        self.sessions.lock().await.get(name).copied()
    }

    /// Remove `name` only while it still maps to `handle`.
    pub async fn remove_if(&self, name: &LoginName, handle: ConnectionHandle) -> bool {
        let mut sessions = self.sessions.lock().await;
        if sessions.get(name) == Some(&handle) {
            sessions.remove(name);
            true
        } else {
            false
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }
}

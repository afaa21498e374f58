//! Server state shared by every connection handler.

use std::{sync::Arc, time::Duration};

use parlor_shared::time::get_jst_timestamp;
use tokio::sync::watch;

use crate::{
    config::ServerConfig,
    domain::{CredentialStore, SessionCache, StoreError},
    infrastructure::{
        registry::{ConnectionRegistry, GroupRegistry, SessionRegistry},
        repository::{InMemoryCredentialStore, InMemorySessionCache, SqliteCredentialStore},
    },
    usecase::Router,
};

/// Shared application state
pub struct AppState {
    /// Command dispatch (UseCase 層への入口)
    pub router: Router,
    pub connections: Arc<ConnectionRegistry>,
    pub sessions: Arc<SessionRegistry>,
    pub groups: Arc<GroupRegistry>,
    /// Credential Store（データアクセス層の抽象化）
    pub credentials: Arc<dyn CredentialStore>,
    /// Session Cache（データアクセス層の抽象化）
    pub session_cache: Arc<dyn SessionCache>,
    /// Unix timestamp when the state was built (milliseconds)
    pub started_at: i64,
    /// First fatal failure reported by a connection handler
    fatal: watch::Sender<Option<String>>,
}

impl AppState {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        session_cache: Arc<dyn SessionCache>,
        session_ttl: Duration,
    ) -> Self {
        let connections = Arc::new(ConnectionRegistry::new());
        let sessions = Arc::new(SessionRegistry::new());
        let groups = Arc::new(GroupRegistry::new());
        let router = Router::new(
            credentials.clone(),
            session_cache.clone(),
            sessions.clone(),
            groups.clone(),
            connections.clone(),
            session_ttl,
        );
        let (fatal, _) = watch::channel(None);

        Self {
            router,
            connections,
            sessions,
            groups,
            credentials,
            session_cache,
            started_at: get_jst_timestamp(),
            fatal,
        }
    }

    /// State with the collaborators selected by `config`.
    ///
    /// The Credential Store is SQLite when `credential_db` is set and
    /// in-memory otherwise. The Session Cache is always in-memory.
    pub fn from_config(config: &ServerConfig) -> Result<Self, StoreError> {
        let credentials: Arc<dyn CredentialStore> = match &config.credential_db {
            Some(path) => Arc::new(SqliteCredentialStore::open(path)?),
            None => Arc::new(InMemoryCredentialStore::new()),
        };
        Ok(Self::new(
            credentials,
            Arc::new(InMemorySessionCache::new()),
            config.session_ttl,
        ))
    }

    /// Ask the server to stop. Only the first reason is kept.
    pub fn report_fatal(&self, reason: impl Into<String>) {
        let reason = reason.into();
        self.fatal.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            *current = Some(reason);
            true
        });
    }

    /// Receiver that observes `report_fatal`.
    pub fn fatal_receiver(&self) -> watch::Receiver<Option<String>> {
        self.fatal.subscribe()
    }
}

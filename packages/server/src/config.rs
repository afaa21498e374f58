//! Server configuration.

use std::{path::PathBuf, time::Duration};

/// Listen backlog used when none is configured
pub const DEFAULT_BACKLOG: u32 = 20;

/// Lifetime of a session token in the Session Cache
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(300);

/// Runtime settings for `run`, filled from the command line by the binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host name or IP address to listen on
    pub host: String,
    pub port: u16,
    /// Pending-connection queue length passed to `listen(2)`
    pub backlog: u32,
    pub session_ttl: Duration,
    /// SQLite file for the Credential Store; in-memory when unset
    pub credential_db: Option<PathBuf>,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            backlog: DEFAULT_BACKLOG,
            session_ttl: DEFAULT_SESSION_TTL,
            credential_db: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_keeps_defaults_for_backlog_and_ttl() {
        // テスト項目: ホストとポート以外は既定値になる
        // given (前提条件):
        let host = "0.0.0.0";

        // when (操作):
        let config = ServerConfig::new(host, 9000);

        // then (期待する結果):
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert_eq!(config.backlog, 20);
        assert_eq!(config.session_ttl, Duration::from_secs(300));
        assert_eq!(config.credential_db, None);
    }
}

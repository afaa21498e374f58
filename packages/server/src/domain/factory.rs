//! Domain factories for creating identifiers.

use rand::{Rng, distr::Alphanumeric};

use super::value_object::{ConnectionHandle, SESSION_TOKEN_LEN, SessionToken};

/// Factory for minting session tokens.
///
/// Tokens are drawn uniformly from `[0-9a-zA-Z]` with the thread-local
/// CSPRNG. Length and alphabet are part of the wire protocol.
pub struct SessionTokenFactory;

impl SessionTokenFactory {
    /// Generate a new 10-character SessionToken.
    pub fn generate() -> SessionToken {
        let token: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(SESSION_TOKEN_LEN)
            .map(char::from)
            .collect();
        SessionToken::from_generated(token)
    }
}

/// Factory for generating ConnectionHandle instances.
pub struct ConnectionHandleFactory;

impl ConnectionHandleFactory {
    /// Generate a new ConnectionHandle with a random UUID v4.
    pub fn generate() -> ConnectionHandle {
        ConnectionHandle::from_uuid(uuid::Uuid::new_v4())
    }
}

//! Collaborator traits.
//!
//! The domain defines what it needs from credential storage and the session
//! cache; `infrastructure::repository` provides the implementations
//! (dependency inversion).

use std::time::Duration;

use async_trait::async_trait;

use super::{
    error::StoreError,
    value_object::{LoginName, Password, SessionToken},
};

/// Outcome of a credential check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authentication {
    Accepted,
    WrongPassword,
    UnknownUser,
}

/// Durable user records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Check the backend is reachable.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Store a new record. Fails with `DuplicateName` if `name` exists.
    async fn register(&self, name: &LoginName, password: &Password) -> Result<(), StoreError>;

    /// Compare `password` against the stored record for `name`.
    async fn authenticate(
        &self,
        name: &LoginName,
        password: &Password,
    ) -> Result<Authentication, StoreError>;
}

/// Ephemeral session tokens with expiry
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionCache: Send + Sync {
    /// Check the backend is reachable.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Bind `token` to `name` for `ttl`.
    async fn put(
        &self,
        token: &SessionToken,
        name: &LoginName,
        ttl: Duration,
    ) -> Result<(), StoreError>;

    /// Name bound to `token`, unless unknown or expired.
    async fn get(&self, token: &str) -> Result<Option<LoginName>, StoreError>;
}

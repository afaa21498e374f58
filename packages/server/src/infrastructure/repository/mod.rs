//! Collaborator implementations.
//!
//! Concrete implementations of the traits defined in `domain::repository`.
//! Use cases depend on the traits only (dependency inversion).

pub mod inmemory;
pub mod sqlite;

pub use inmemory::{InMemoryCredentialStore, InMemorySessionCache};
pub use sqlite::SqliteCredentialStore;

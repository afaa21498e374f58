//! In-memory collaborators.
//!
//! A `HashMap` stands in for the relational credential table and for the
//! key/value session cache. State is lost on restart; a networked backend
//! plugs in by implementing the same traits.

pub mod credential;
pub mod session_cache;

pub use credential::InMemoryCredentialStore;
pub use session_cache::InMemorySessionCache;

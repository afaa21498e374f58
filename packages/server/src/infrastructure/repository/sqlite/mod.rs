//! SQLite collaborators.
//!
//! rusqlite is synchronous; the connection sits behind `Arc<Mutex<_>>` and
//! every query runs on the blocking pool via `tokio::task::spawn_blocking`.

pub mod credential;

pub use credential::SqliteCredentialStore;

//! Parlor chat message router.
//!
//! Clients connect over WebSocket, authenticate against a Credential Store
//! and then exchange private messages or broadcast to numbered groups.
//! Layers follow the usual split: `domain` (wire protocol, value objects,
//! collaborator traits), `usecase` (routing), `infrastructure` (registries
//! and in-memory collaborators) and `ui` (axum listener and handlers).

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use config::ServerConfig;
pub use ui::{ServerError, run as run_server};

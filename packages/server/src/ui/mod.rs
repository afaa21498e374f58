//! WebSocket chat server: listener, connection handlers and shared state.

mod error;
mod handler;
mod runner;
mod signal;
pub mod state;

pub use error::ServerError;
pub use runner::{bind, build_app, run, serve};
pub use signal::shutdown_signal;

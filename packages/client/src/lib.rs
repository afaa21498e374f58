//! Parlor command-line chat client.
//!
//! Reads slash commands and plain text from the terminal, encodes them as
//! protocol commands and prints every frame the server sends.

pub mod error;
pub mod input;
pub mod runner;
pub mod session;

// Re-export entry points
pub use error::ClientError;
pub use runner::run_client;

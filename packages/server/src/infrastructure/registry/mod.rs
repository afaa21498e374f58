//! Shared in-process registries.
//!
//! Each registry is one map behind one `tokio::sync::Mutex`. Methods return
//! owned snapshots so no caller holds a lock while delivering frames.

pub mod connection;
pub mod group;
pub mod session;

pub use connection::{ConnectionInfo, ConnectionRegistry, DeliveryError};
pub use group::GroupRegistry;
pub use session::SessionRegistry;

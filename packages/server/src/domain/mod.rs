//! Domain layer for the chat router.
//!
//! Wire protocol, session state and value objects, independent of the
//! transport and of the concrete stores.

pub mod command;
pub mod error;
pub mod factory;
pub mod reply;
pub mod repository;
pub mod session;
pub mod value_object;

pub use command::{Command, EXIT_SENTINEL};
pub use error::{DecodeError, StoreError, ValueObjectError};
pub use factory::{ConnectionHandleFactory, SessionTokenFactory};
pub use reply::{Reply, relay_frame};
pub use repository::{Authentication, CredentialStore, SessionCache};
pub use session::SessionState;
pub use value_object::{ConnectionHandle, GroupId, LoginName, MessageBody, Password, SessionToken};

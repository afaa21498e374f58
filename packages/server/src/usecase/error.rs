//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{GroupId, LoginName, StoreError};

/// Failure that stops the server: a collaborator could not serve a command.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("collaborator failure: {0}")]
    Store(#[from] StoreError),
}

/// Reasons a private or group message was dropped.
///
/// These are logged and never reported to the sender.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SendMessageError {
    #[error("no private-chat target selected")]
    NoTargetSelected,

    #[error("target '{0}' is not online")]
    TargetOffline(LoginName),

    #[error("no group joined")]
    NoGroupJoined,

    #[error("group {0} has no other members")]
    NoRecipients(GroupId),
}

//! Errors that stop the server.

use std::{io, net::SocketAddr};

use thiserror::Error;

use crate::domain::StoreError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("cannot resolve listen address '{addr}': {source}")]
    Resolve {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to listen on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] io::Error),

    #[error("collaborator unavailable at startup: {0}")]
    CollaboratorUnavailable(#[from] StoreError),

    #[error("fatal collaborator failure: {0}")]
    Fatal(String),
}

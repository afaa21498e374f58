//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// LoginName validation error
    #[error("LoginName cannot be empty")]
    LoginNameEmpty,

    /// LoginName too long error
    #[error("LoginName cannot exceed {max} bytes (got {actual})")]
    LoginNameTooLong { max: usize, actual: usize },

    /// LoginName contains a character the wire grammar reserves
    #[error("LoginName cannot contain whitespace or ':' (got: {0})")]
    LoginNameInvalidCharacter(String),

    /// Password validation error
    #[error("Password cannot be empty")]
    PasswordEmpty,

    /// Password too long error
    #[error("Password cannot exceed {max} bytes (got {actual})")]
    PasswordTooLong { max: usize, actual: usize },

    /// GroupId is not an integer
    #[error("GroupId must be an integer (got: {0})")]
    GroupIdInvalidFormat(String),

    /// MessageBody validation error
    #[error("MessageBody cannot be empty")]
    MessageBodyEmpty,

    /// MessageBody too long error
    #[error("MessageBody cannot exceed {max} bytes (got {actual})")]
    MessageBodyTooLong { max: usize, actual: usize },

    /// SessionToken is not 10 alphanumeric characters
    #[error("SessionToken must be {len} ASCII alphanumeric characters (got: {actual})")]
    SessionTokenInvalidFormat { len: usize, actual: String },
}

/// Errors produced while decoding one inbound wire message into a `Command`
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The message does not start with any known command tag
    #[error("unrecognized command: {0:?}")]
    UnknownCommand(String),

    /// A field tag required by the command is absent
    #[error("'{command}' is missing the '{tag}' field")]
    MissingField {
        command: &'static str,
        tag: &'static str,
    },

    /// A field is present but its value is invalid
    #[error("'{command}' has an invalid '{tag}' field: {source}")]
    InvalidField {
        command: &'static str,
        tag: &'static str,
        #[source]
        source: ValueObjectError,
    },
}

impl DecodeError {
    /// Command whose prefix was recognized, if any.
    pub fn command(&self) -> Option<&'static str> {
        match self {
            Self::UnknownCommand(_) => None,
            Self::MissingField { command, .. } | Self::InvalidField { command, .. } => {
                Some(command)
            }
        }
    }
}

/// Errors reported by the external collaborators (Credential Store, Session Cache)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backend cannot be reached; fatal for the server
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Registration for a name that already has a record
    #[error("name already registered: {0}")]
    DuplicateName(String),
}

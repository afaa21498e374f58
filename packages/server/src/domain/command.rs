//! Text wire protocol: one `Command` per inbound message.
//!
//! Every command starts with its tag (`login:`, `content:`, ...). Commands
//! with two fields carry a second tag (`pass:`, `from:`); the first field runs
//! up to that tag and the last field always runs to the end of the message,
//! so message bodies may contain any text.

use std::fmt;

use super::{
    error::{DecodeError, ValueObjectError},
    value_object::{GroupId, LoginName, MessageBody, Password},
};

/// Message that closes the connection from the server side.
pub const EXIT_SENTINEL: &str = "content:exit";

/// Literal field tags of the wire grammar.
pub mod tag {
    pub const COOKIE: &str = "cookie:";
    pub const NAME: &str = "name:";
    pub const PASS: &str = "pass:";
    pub const LOGIN: &str = "login:";
    pub const TARGET: &str = "target:";
    pub const FROM: &str = "from:";
    pub const CONTENT: &str = "content:";
    pub const GROUP: &str = "group:";
    pub const GROUP_MESSAGE: &str = "gr_message:";
}

/// One decoded unit of the wire protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Look up a session token in the Session Cache
    Cookie { token: String },
    /// Register new credentials
    Register { name: LoginName, password: Password },
    /// Authenticate and open a session
    Login { name: LoginName, password: Password },
    /// Select the private-chat destination
    Target { target: LoginName, from: LoginName },
    /// Private message to the selected target
    Content { body: MessageBody },
    /// Join a group channel
    Group { group_id: GroupId },
    /// Broadcast to the current group
    GroupMessage { body: MessageBody },
}

impl Command {
    /// Decode one inbound message.
    ///
    /// A trailing `\r\n` is ignored. An unknown prefix yields
    /// `DecodeError::UnknownCommand`; a known prefix with missing or invalid
    /// fields yields `MissingField` / `InvalidField`.
    pub fn decode(raw: &str) -> Result<Self, DecodeError> {
        let message = raw.trim_end_matches(['\r', '\n']);

        if let Some(rest) = message.strip_prefix(tag::COOKIE) {
            return Ok(Self::Cookie {
                token: rest.trim().to_string(),
            });
        }
        if let Some(rest) = message.strip_prefix(tag::NAME) {
            let (name, password) = split_field("name", rest, tag::PASS)?;
            return Ok(Self::Register {
                name: field("name", tag::NAME, LoginName::new(name.to_string()))?,
                password: field("name", tag::PASS, Password::new(password.to_string()))?,
            });
        }
        if let Some(rest) = message.strip_prefix(tag::LOGIN) {
            let (name, password) = split_field("login", rest, tag::PASS)?;
            return Ok(Self::Login {
                name: field("login", tag::LOGIN, LoginName::new(name.to_string()))?,
                password: field("login", tag::PASS, Password::new(password.to_string()))?,
            });
        }
        if let Some(rest) = message.strip_prefix(tag::TARGET) {
            let (target, from) = split_field("target", rest, tag::FROM)?;
            return Ok(Self::Target {
                target: field("target", tag::TARGET, LoginName::new(target.to_string()))?,
                from: field("target", tag::FROM, LoginName::new(from.to_string()))?,
            });
        }
        if let Some(rest) = message.strip_prefix(tag::CONTENT) {
            return Ok(Self::Content {
                body: field("content", tag::CONTENT, MessageBody::new(rest.to_string()))?,
            });
        }
        if let Some(rest) = message.strip_prefix(tag::GROUP) {
            return Ok(Self::Group {
                group_id: field("group", tag::GROUP, rest.parse())?,
            });
        }
        if let Some(rest) = message.strip_prefix(tag::GROUP_MESSAGE) {
            return Ok(Self::GroupMessage {
                body: field(
                    "gr_message",
                    tag::GROUP_MESSAGE,
                    MessageBody::new(rest.to_string()),
                )?,
            });
        }

        Err(DecodeError::UnknownCommand(preview(message)))
    }

    /// Encode back to wire text, as a client sends it.
    pub fn encode(&self) -> String {
        match self {
            Self::Cookie { token } => format!("{}{}", tag::COOKIE, token),
            Self::Register { name, password } => {
                format!("{}{}{}{}", tag::NAME, name, tag::PASS, password.as_str())
            }
            Self::Login { name, password } => {
                format!("{}{}{}{}", tag::LOGIN, name, tag::PASS, password.as_str())
            }
            Self::Target { target, from } => {
                format!("{}{}{}{}", tag::TARGET, target, tag::FROM, from)
            }
            Self::Content { body } => format!("{}{}", tag::CONTENT, body),
            Self::Group { group_id } => format!("{}{}", tag::GROUP, group_id),
            Self::GroupMessage { body } => format!("{}{}", tag::GROUP_MESSAGE, body),
        }
    }

    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Cookie { .. } => "cookie",
            Self::Register { .. } => "name",
            Self::Login { .. } => "login",
            Self::Target { .. } => "target",
            Self::Content { .. } => "content",
            Self::Group { .. } => "group",
            Self::GroupMessage { .. } => "gr_message",
        }
    }

    /// Whether the command may run before the session is authenticated.
    pub fn is_pre_login(&self) -> bool {
        matches!(
            self,
            Self::Cookie { .. } | Self::Register { .. } | Self::Login { .. }
        )
    }
}

impl fmt::Display for Command {
    /// Log-safe rendering; never prints passwords or bodies.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cookie { .. } => write!(f, "cookie"),
            Self::Register { name, .. } => write!(f, "name:{name}"),
            Self::Login { name, .. } => write!(f, "login:{name}"),
            Self::Target { target, from } => write!(f, "target:{target} from:{from}"),
            Self::Content { body } => write!(f, "content ({} bytes)", body.as_str().len()),
            Self::Group { group_id } => write!(f, "group:{group_id}"),
            Self::GroupMessage { body } => {
                write!(f, "gr_message ({} bytes)", body.as_str().len())
            }
        }
    }
}

fn split_field<'a>(
    command: &'static str,
    rest: &'a str,
    tag: &'static str,
) -> Result<(&'a str, &'a str), DecodeError> {
    rest.find(tag)
        .map(|pos| (&rest[..pos], &rest[pos + tag.len()..]))
        .ok_or(DecodeError::MissingField { command, tag })
}

fn field<T>(
    command: &'static str,
    tag: &'static str,
    value: Result<T, ValueObjectError>,
) -> Result<T, DecodeError> {
    value.map_err(|source| DecodeError::InvalidField {
        command,
        tag,
        source,
    })
}

fn preview(message: &str) -> String {
    message.chars().take(16).collect()
}

//! What the client knows about its own login.
//!
//! Replies carry no command tag, so the client remembers which request is
//! waiting for one. Relayed messages always start with `[` and are never
//! taken as replies.

use parlor_server::domain::{Command, LoginName, reply};

/// Request awaiting a server reply
#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum Pending {
    #[default]
    Nothing,
    Login(LoginName),
    Cookie,
}

/// How the client should present a frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// `[sender]:body` from another user
    Relayed(String),
    LoggedIn { name: LoginName, token: String },
    LoginRejected,
    Resumed(LoginName),
    CookieUnknown,
    /// Anything else the server sent
    Other(String),
}

#[derive(Debug, Default)]
pub struct ClientSession {
    name: Option<LoginName>,
    pending: Pending,
}

impl ClientSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name the server accepted for this connection.
    pub fn name(&self) -> Option<&LoginName> {
        self.name.as_ref()
    }

    /// Record a command about to be sent.
    pub fn on_send(&mut self, command: &Command) {
        match command {
            Command::Login { name, .. } => self.pending = Pending::Login(name.clone()),
            Command::Cookie { .. } => self.pending = Pending::Cookie,
            _ => {}
        }
    }

    /// Classify an inbound frame and update the login state.
    pub fn on_frame(&mut self, frame: &str) -> Frame {
        if frame.starts_with('[') {
            return Frame::Relayed(frame.to_string());
        }

        match std::mem::take(&mut self.pending) {
            Pending::Login(name) => {
                if let Some(token) = frame.strip_prefix(reply::LOGIN_ACCEPTED_PREFIX) {
                    self.name = Some(name.clone());
                    Frame::LoggedIn {
                        name,
                        token: token.to_string(),
                    }
                } else {
                    Frame::LoginRejected
                }
            }
            Pending::Cookie if frame == reply::COOKIE_NOT_FOUND => Frame::CookieUnknown,
            Pending::Cookie => match LoginName::new(frame.to_string()) {
                Ok(name) => {
                    self.name = Some(name.clone());
                    Frame::Resumed(name)
                }
                Err(_) => Frame::Other(frame.to_string()),
            },
            Pending::Nothing => Frame::Other(frame.to_string()),
        }
    }
}

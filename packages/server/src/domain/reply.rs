//! Server-to-client text frames.

use std::fmt;

use super::{
    error::DecodeError,
    value_object::{LoginName, MessageBody, SessionToken},
};

/// Prefix of a successful login reply; the token follows directly.
pub const LOGIN_ACCEPTED_PREFIX: &str = "ok";

/// Reply to a failed login (wrong password or unknown user).
pub const LOGIN_REJECTED: &str = "wrong";

/// Reply to a cookie lookup that found nothing.
pub const COOKIE_NOT_FOUND: &str = "NULL";

/// Reply sent back to the connection that issued a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    LoginAccepted(SessionToken),
    LoginRejected,
    CookieFound(LoginName),
    CookieNotFound,
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoginAccepted(token) => write!(f, "{LOGIN_ACCEPTED_PREFIX}{token}"),
            Self::LoginRejected => f.write_str(LOGIN_REJECTED),
            Self::CookieFound(name) => write!(f, "{name}"),
            Self::CookieNotFound => f.write_str(COOKIE_NOT_FOUND),
        }
    }
}

impl Reply {
    /// Reply owed to a command that failed to decode.
    ///
    /// A `login:` is always answered, so a malformed one is rejected like a
    /// wrong password. Every other malformed command stays silent.
    pub fn for_malformed(error: &DecodeError) -> Option<Self> {
        match error.command() {
            Some("login") => Some(Self::LoginRejected),
            _ => None,
        }
    }
}

/// Frame delivered to the recipients of a private or group message.
pub fn relay_frame(sender: &LoginName, body: &MessageBody) -> String {
    format!("[{sender}]:{body}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_wire_format() {
        // テスト項目: 各応答は固定のワイヤ形式で表現される
        // given (前提条件):
        let token = SessionToken::new("aZ09bY18cX".to_string()).unwrap();
        let name = LoginName::new("alice".to_string()).unwrap();

        // then (期待する結果):
        assert_eq!(Reply::LoginAccepted(token).to_string(), "okaZ09bY18cX");
        assert_eq!(Reply::LoginRejected.to_string(), "wrong");
        assert_eq!(Reply::CookieFound(name).to_string(), "alice");
        assert_eq!(Reply::CookieNotFound.to_string(), "NULL");
    }

    #[test]
    fn test_malformed_login_is_rejected() {
        // テスト項目: 不正な login: には wrong を返し、他の不正なコマンドには何も返さない
        // given (前提条件):
        let empty_password = DecodeError::InvalidField {
            command: "login",
            tag: "pass:",
            source: crate::domain::ValueObjectError::PasswordEmpty,
        };
        let missing_pass = DecodeError::MissingField {
            command: "login",
            tag: "pass:",
        };
        let bad_target = DecodeError::MissingField {
            command: "target",
            tag: "from:",
        };
        let unknown = DecodeError::UnknownCommand("hello".to_string());

        // then (期待する結果):
        assert_eq!(Reply::for_malformed(&empty_password), Some(Reply::LoginRejected));
        assert_eq!(Reply::for_malformed(&missing_pass), Some(Reply::LoginRejected));
        assert_eq!(Reply::for_malformed(&bad_target), None);
        assert_eq!(Reply::for_malformed(&unknown), None);
    }

    #[test]
    fn test_relay_frame() {
        // テスト項目: 転送メッセージは送信者名を角括弧で前置する
        // given (前提条件):
        let sender = LoginName::new("alice".to_string()).unwrap();
        let body = MessageBody::new("hi".to_string()).unwrap();

        // then (期待する結果):
        assert_eq!(relay_frame(&sender, &body), "[alice]:hi");
    }
}

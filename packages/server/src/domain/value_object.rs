//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use std::{fmt, str::FromStr};
use uuid::Uuid;

use super::error::ValueObjectError;

/// Maximum length of a login name, in bytes
pub const LOGIN_NAME_MAX_LEN: usize = 64;

/// Maximum length of a password, in bytes
pub const PASSWORD_MAX_LEN: usize = 128;

/// Maximum length of a relayed message body, in bytes
pub const MESSAGE_BODY_MAX_LEN: usize = 4096;

/// Length of a session token
pub const SESSION_TOKEN_LEN: usize = 10;

/// Opaque identifier of one live connection.
///
/// Backed by a random UUID v4, so a handle is never handed out twice within
/// a process. Holding a handle does not mean the connection is still open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionHandle(Uuid);

impl ConnectionHandle {
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for ConnectionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Login name value object.
///
/// Represents the name a user registers and logs in with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LoginName(String);

impl LoginName {
    /// Create a new LoginName.
    ///
    /// Surrounding whitespace is trimmed before validation.
    ///
    /// # Arguments
    ///
    /// * `name` - The login name string
    ///
    /// # Returns
    ///
    /// A Result containing the LoginName or an error if validation fails
    pub fn new(name: String) -> Result<Self, ValueObjectError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::LoginNameEmpty);
        }
        let len = trimmed.len();
        if len > LOGIN_NAME_MAX_LEN {
            return Err(ValueObjectError::LoginNameTooLong {
                max: LOGIN_NAME_MAX_LEN,
                actual: len,
            });
        }
        if trimmed.chars().any(|c| c.is_whitespace() || c == ':') {
            return Err(ValueObjectError::LoginNameInvalidCharacter(
                trimmed.to_string(),
            ));
        }
        if trimmed.len() == name.len() {
            Ok(Self(name))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LoginName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Password value object.
///
/// Taken verbatim from the wire. Debug output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn new(password: String) -> Result<Self, ValueObjectError> {
        if password.is_empty() {
            return Err(ValueObjectError::PasswordEmpty);
        }
        let len = password.len();
        if len > PASSWORD_MAX_LEN {
            return Err(ValueObjectError::PasswordTooLong {
                max: PASSWORD_MAX_LEN,
                actual: len,
            });
        }
        Ok(Self(password))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Group channel identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(i64);

impl GroupId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }
}

impl FromStr for GroupId {
    type Err = ValueObjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| ValueObjectError::GroupIdInvalidFormat(s.to_string()))
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Message body value object.
///
/// The text of a private or group message, relayed verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBody(String);

impl MessageBody {
    pub fn new(body: String) -> Result<Self, ValueObjectError> {
        if body.is_empty() {
            return Err(ValueObjectError::MessageBodyEmpty);
        }
        let len = body.len();
        if len > MESSAGE_BODY_MAX_LEN {
            return Err(ValueObjectError::MessageBodyTooLong {
                max: MESSAGE_BODY_MAX_LEN,
                actual: len,
            });
        }
        Ok(Self(body))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Session token handed out on login and presented back with `cookie:`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    /// Create a SessionToken from exactly 10 ASCII alphanumeric characters.
    pub fn new(token: String) -> Result<Self, ValueObjectError> {
        let valid = token.len() == SESSION_TOKEN_LEN
            && token.bytes().all(|b| b.is_ascii_alphanumeric());
        if !valid {
            return Err(ValueObjectError::SessionTokenInvalidFormat {
                len: SESSION_TOKEN_LEN,
                actual: token,
            });
        }
        Ok(Self(token))
    }

    /// Wrap a token minted by `SessionTokenFactory`, which already
    /// guarantees the format.
    pub(super) fn from_generated(token: String) -> Self {
        debug_assert_eq!(token.len(), SESSION_TOKEN_LEN);
        Self(token)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_name_new_success() {
        // テスト項目: 有効なログイン名を作成できる
        // given (前提条件):
        let name = "alice".to_string();

        // when (操作):
        let result = LoginName::new(name);

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(result.unwrap().as_str(), "alice");
    }

    #[test]
    fn test_login_name_is_trimmed() {
        // テスト項目: 前後の空白は取り除かれる
        // when (操作):
        let result = LoginName::new(" bob \t".to_string());

        // then (期待する結果):
        assert_eq!(result.unwrap().as_str(), "bob");
    }

    #[test]
    fn test_login_name_new_empty_fails() {
        // テスト項目: 空白のみのログイン名は作成できない
        // when (操作):
        let result = LoginName::new("   ".to_string());

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), ValueObjectError::LoginNameEmpty);
    }

    #[test]
    fn test_login_name_new_too_long_fails() {
        // テスト項目: 65 バイト以上のログイン名は作成できない
        // given (前提条件):
        let name = "a".repeat(65);

        // when (操作):
        let result = LoginName::new(name);

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            ValueObjectError::LoginNameTooLong {
                max: 64,
                actual: 65
            }
        );
    }

    #[test]
    fn test_login_name_rejects_inner_separator() {
        // テスト項目: 内部に空白やコロンを含むログイン名は作成できない
        // then (期待する結果):
        assert!(matches!(
            LoginName::new("al ice".to_string()),
            Err(ValueObjectError::LoginNameInvalidCharacter(_))
        ));
        assert!(matches!(
            LoginName::new("al:ice".to_string()),
            Err(ValueObjectError::LoginNameInvalidCharacter(_))
        ));
    }

    #[test]
    fn test_password_is_verbatim_and_redacted() {
        // テスト項目: パスワードはそのまま保持され、Debug 出力では伏せられる
        // when (操作):
        let password = Password::new(" s3cret ".to_string()).unwrap();

        // then (期待する結果):
        assert_eq!(password.as_str(), " s3cret ");
        assert_eq!(format!("{password:?}"), "Password(***)");
    }

    #[test]
    fn test_group_id_from_str() {
        // テスト項目: 整数文字列からグループ ID を作成でき、非整数は拒否される
        // then (期待する結果):
        assert_eq!("42".parse::<GroupId>().unwrap(), GroupId::new(42));
        assert_eq!(" -7 ".parse::<GroupId>().unwrap(), GroupId::new(-7));
        assert_eq!(
            "forty-two".parse::<GroupId>().unwrap_err(),
            ValueObjectError::GroupIdInvalidFormat("forty-two".to_string())
        );
    }

    #[test]
    fn test_message_body_new_empty_fails() {
        // テスト項目: 空のメッセージ本文は作成できない
        // when (操作):
        let result = MessageBody::new(String::new());

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), ValueObjectError::MessageBodyEmpty);
    }

    #[test]
    fn test_message_body_new_too_long_fails() {
        // テスト項目: 4097 バイト以上のメッセージ本文は作成できない
        // when (操作):
        let result = MessageBody::new("a".repeat(4097));

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            ValueObjectError::MessageBodyTooLong {
                max: 4096,
                actual: 4097
            }
        );
    }

    #[test]
    fn test_session_token_validation() {
        // テスト項目: セッショントークンは英数字 10 文字のみ受け付ける
        // then (期待する結果):
        assert!(SessionToken::new("aZ09bY18cX".to_string()).is_ok());
        assert!(SessionToken::new("short".to_string()).is_err());
        assert!(SessionToken::new("aZ09bY18c!".to_string()).is_err());
    }
}

//! Per-connection session state.

use super::value_object::{ConnectionHandle, GroupId, LoginName};

/// Authentication and routing context of one connection.
///
/// Owned by exactly one connection handler and passed to the router by
/// `&mut`; never shared between tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub authenticated: bool,
    pub login_name: Option<LoginName>,
    pub target_name: Option<LoginName>,
    /// Cached routing shortcut for `target_name`; may point at a closed connection
    pub target_handle: Option<ConnectionHandle>,
    pub group_id: Option<GroupId>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the session as logged in under `name`.
    ///
    /// Returns the previous login name when it differs from `name`.
    pub fn authenticate(&mut self, name: LoginName) -> Option<LoginName> {
        self.authenticated = true;
        match self.login_name.replace(name) {
            Some(previous) if Some(&previous) != self.login_name.as_ref() => Some(previous),
            _ => None,
        }
    }

    /// Name to relay messages under, if logged in.
    pub fn sender(&self) -> Option<&LoginName> {
        if self.authenticated {
            self.login_name.as_ref()
        } else {
            None
        }
    }

    pub fn select_target(&mut self, name: LoginName, handle: Option<ConnectionHandle>) {
        self.target_name = Some(name);
        self.target_handle = handle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> LoginName {
        LoginName::new(s.to_string()).unwrap()
    }

    #[test]
    fn test_new_session_is_anonymous() {
        // テスト項目: 新しいセッションは未認証で送信者名を持たない
        // when (操作):
        let session = SessionState::new();

        // then (期待する結果):
        assert!(!session.authenticated);
        assert!(session.sender().is_none());
        assert!(session.target_handle.is_none());
        assert!(session.group_id.is_none());
    }

    #[test]
    fn test_authenticate_reports_previous_name() {
        // テスト項目: 別名で再ログインすると以前の名前が返され、同名では返されない
        // given (前提条件):
        let mut session = SessionState::new();

        // when (操作):
        let first = session.authenticate(name("alice"));
        let same = session.authenticate(name("alice"));
        let switched = session.authenticate(name("bob"));

        // then (期待する結果):
        assert_eq!(first, None);
        assert_eq!(same, None);
        assert_eq!(switched, Some(name("alice")));
        assert_eq!(session.sender(), Some(&name("bob")));
    }
}

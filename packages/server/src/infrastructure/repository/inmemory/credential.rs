//! InMemory Credential Store

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Authentication, CredentialStore, LoginName, Password, StoreError};

/// Credential records keyed by login name.
///
/// Passwords are compared in plaintext.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    users: Mutex<HashMap<LoginName, Password>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn register(&self, name: &LoginName, password: &Password) -> Result<(), StoreError> {
        let mut users = self.users.lock().await;
        if users.contains_key(name) {
            return Err(StoreError::DuplicateName(name.as_str().to_string()));
        }
        users.insert(name.clone(), password.clone());
        Ok(())
    }

    async fn authenticate(
        &self,
        name: &LoginName,
        password: &Password,
    ) -> Result<Authentication, StoreError> {
        let users = self.users.lock().await;
        Ok(match users.get(name) {
            Some(stored) if stored == password => Authentication::Accepted,
            Some(_) => Authentication::WrongPassword,
            None => Authentication::UnknownUser,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> LoginName {
        LoginName::new(s.to_string()).unwrap()
    }

    fn password(s: &str) -> Password {
        Password::new(s.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_register_then_authenticate() {
        // テスト項目: 登録したユーザーは正しいパスワードで認証される
        // given (前提条件):
        let store = InMemoryCredentialStore::new();
        store.register(&name("alice"), &password("pw")).await.unwrap();

        // when (操作):
        let accepted = store.authenticate(&name("alice"), &password("pw")).await;
        let wrong = store.authenticate(&name("alice"), &password("nope")).await;
        let unknown = store.authenticate(&name("bob"), &password("pw")).await;

        // then (期待する結果):
        assert_eq!(accepted, Ok(Authentication::Accepted));
        assert_eq!(wrong, Ok(Authentication::WrongPassword));
        assert_eq!(unknown, Ok(Authentication::UnknownUser));
    }

    #[tokio::test]
    async fn test_register_duplicate_fails() {
        // テスト項目: 既存の名前での登録は DuplicateName になり、元のパスワードが残る
        // given (前提条件):
        let store = InMemoryCredentialStore::new();
        store.register(&name("alice"), &password("first")).await.unwrap();

        // when (操作):
        let result = store.register(&name("alice"), &password("second")).await;

        // then (期待する結果):
        assert_eq!(result, Err(StoreError::DuplicateName("alice".to_string())));
        assert_eq!(
            store.authenticate(&name("alice"), &password("first")).await,
            Ok(Authentication::Accepted)
        );
    }
}

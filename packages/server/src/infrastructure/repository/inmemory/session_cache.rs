//! InMemory Session Cache

use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use tokio::{sync::Mutex, time::Instant};

use crate::domain::{LoginName, SessionCache, SessionToken, StoreError};

struct CachedSession {
    name: LoginName,
    expires_at: Instant,
}

/// Session tokens with per-entry expiry.
///
/// Expired entries read as absent and are evicted on access. Uses the tokio
/// clock, so paused test time drives expiry.
#[derive(Default)]
pub struct InMemorySessionCache {
    entries: Mutex<HashMap<String, CachedSession>>,
}

impl InMemorySessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included until evicted.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[async_trait]
impl SessionCache for InMemorySessionCache {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn put(
        &self,
        token: &SessionToken,
        name: &LoginName,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        entries.retain(|_, session| session.expires_at > now);
        entries.insert(
            token.as_str().to_string(),
            CachedSession {
                name: name.clone(),
                expires_at: now + ttl,
            },
        );
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<LoginName>, StoreError> {
        let mut entries = self.entries.lock().await;
        match entries.get(token) {
            Some(session) if session.expires_at > Instant::now() => Ok(Some(session.name.clone())),
            Some(_) => {
                entries.remove(token);
                Ok(None)
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SessionTokenFactory;

    const TTL: Duration = Duration::from_secs(300);

    fn name(s: &str) -> LoginName {
        LoginName::new(s.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_put_then_get() {
        // テスト項目: 保存したトークンから名前を引ける
        // given (前提条件):
        let cache = InMemorySessionCache::new();
        let token = SessionTokenFactory::generate();

        // when (操作):
        cache.put(&token, &name("alice"), TTL).await.unwrap();

        // then (期待する結果):
        assert_eq!(cache.get(token.as_str()).await, Ok(Some(name("alice"))));
        assert_eq!(cache.get("unknown000").await, Ok(None));
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        // テスト項目: TTL 経過後のトークンは見つからず、削除される
        // given (前提条件):
        let cache = InMemorySessionCache::new();
        let token = SessionTokenFactory::generate();
        cache.put(&token, &name("alice"), TTL).await.unwrap();

        // when (操作):
        tokio::time::advance(Duration::from_secs(299)).await;
        let before = cache.get(token.as_str()).await;
        tokio::time::advance(Duration::from_secs(2)).await;
        let after = cache.get(token.as_str()).await;

        // then (期待する結果):
        assert_eq!(before, Ok(Some(name("alice"))));
        assert_eq!(after, Ok(None));
        assert!(cache.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_put_evicts_expired_entries() {
        // テスト項目: 新しいトークンの保存時に期限切れのエントリが掃除される
        // given (前提条件):
        let cache = InMemorySessionCache::new();
        let old = SessionTokenFactory::generate();
        cache.put(&old, &name("alice"), TTL).await.unwrap();
        tokio::time::advance(TTL + Duration::from_secs(1)).await;

        // when (操作):
        let fresh = SessionTokenFactory::generate();
        cache.put(&fresh, &name("bob"), TTL).await.unwrap();

        // then (期待する結果):
        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.get(fresh.as_str()).await, Ok(Some(name("bob"))));
    }
}

//! UseCase: アカウント処理（登録・ログイン・cookie 照会）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - AccountUseCase::register() / login() / lookup_cookie()
//!
//! ### なぜこのテストが必要か
//! - ログイン成功時に Session Registry と Session Cache の両方が更新されること
//! - 認証失敗時に Session Registry が変化しないこと
//! - 外部ストア障害が致命的エラーとして伝播すること
//!
//! ### どのような状況を想定しているか
//! - 正常系：登録、ログイン、cookie による再開
//! - 異常系：パスワード誤り、未登録ユーザー、重複登録、ストア障害
//! - エッジケース：同じ接続での別名再ログイン

use std::{sync::Arc, time::Duration};

use crate::{
    domain::{
        Authentication, ConnectionHandle, CredentialStore, LoginName, Password, Reply,
        SessionCache, SessionState, SessionTokenFactory, StoreError,
    },
    infrastructure::registry::SessionRegistry,
};

use super::error::RouteError;

/// アカウント関連のユースケース
pub struct AccountUseCase {
    credentials: Arc<dyn CredentialStore>,
    session_cache: Arc<dyn SessionCache>,
    sessions: Arc<SessionRegistry>,
    session_ttl: Duration,
}

impl AccountUseCase {
    /// 新しい AccountUseCase を作成
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        session_cache: Arc<dyn SessionCache>,
        sessions: Arc<SessionRegistry>,
        session_ttl: Duration,
    ) -> Self {
        Self {
            credentials,
            session_cache,
            sessions,
            session_ttl,
        }
    }

    /// 資格情報を登録
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - 登録成功
    /// * `Ok(false)` - 既に登録済みの名前
    /// * `Err(RouteError)` - ストア障害
    pub async fn register(
        &self,
        name: &LoginName,
        password: &Password,
    ) -> Result<bool, RouteError> {
        match self.credentials.register(name, password).await {
            Ok(()) => Ok(true),
            Err(StoreError::DuplicateName(_)) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// ログインを実行
    ///
    /// 成功時はセッションを認証済みにし、Session Registry に登録し、
    /// トークンを発行して Session Cache に TTL 付きで保存する。
    ///
    /// # Returns
    ///
    /// * `Ok(Reply::LoginAccepted)` - 認証成功（トークン付き）
    /// * `Ok(Reply::LoginRejected)` - パスワード誤り・未登録
    /// * `Err(RouteError)` - ストア障害
    pub async fn login(
        &self,
        handle: ConnectionHandle,
        session: &mut SessionState,
        name: LoginName,
        password: &Password,
    ) -> Result<Reply, RouteError> {
        match self.credentials.authenticate(&name, password).await? {
            Authentication::Accepted => {}
            Authentication::WrongPassword | Authentication::UnknownUser => {
                return Ok(Reply::LoginRejected);
            }
        }

        let token = SessionTokenFactory::generate();
        self.session_cache
            .put(&token, &name, self.session_ttl)
            .await?;

        self.open_session(handle, session, name).await;
        Ok(Reply::LoginAccepted(token))
    }

    /// cookie（セッショントークン）を照会
    ///
    /// 有効なトークンであれば、その名前でセッションを再開する。
    pub async fn lookup_cookie(
        &self,
        handle: ConnectionHandle,
        session: &mut SessionState,
        token: &str,
    ) -> Result<Reply, RouteError> {
        match self.session_cache.get(token).await? {
            Some(name) => {
                self.open_session(handle, session, name.clone()).await;
                Ok(Reply::CookieFound(name))
            }
            None => Ok(Reply::CookieNotFound),
        }
    }

    async fn open_session(
        &self,
        handle: ConnectionHandle,
        session: &mut SessionState,
        name: LoginName,
    ) {
        if let Some(previous) = session.authenticate(name.clone()) {
            self.sessions.remove_if(&previous, handle).await;
        }
        if let Some(replaced) = self.sessions.set(name.clone(), handle).await
            && replaced != handle
        {
            tracing::info!(
                "'{}' logged in again from {}; replacing connection {}",
                name,
                handle,
                replaced
            );
        }
    }
}

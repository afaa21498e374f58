//! UseCase: コマンドのディスパッチ
//!
//! Router 自体は状態を持たない。呼び出しごとに接続のハンドルと
//! `&mut SessionState` を受け取り、共有状態はレジストリと外部ストアにある。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - Router::dispatch() / disconnect() をワイヤ形式のコマンドから通して確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：ログイン、cookie、プライベートチャット、グループブロードキャスト
//! - 異常系：パスワード誤り、未ログインのコマンド、ストア障害
//! - エッジケース：別接続からの再ログイン、切断済みの宛先

use std::{sync::Arc, time::Duration};

use crate::{
    domain::{
        Command, ConnectionHandle, CredentialStore, LoginName, Reply, SessionCache, SessionState,
    },
    infrastructure::registry::{ConnectionRegistry, GroupRegistry, SessionRegistry},
};

use super::{
    account::AccountUseCase,
    disconnect::{DisconnectSummary, DisconnectUseCase},
    error::RouteError,
    group_chat::GroupChatUseCase,
    private_chat::PrivateChatUseCase,
};

/// Routes decoded commands to the use cases
pub struct Router {
    account: AccountUseCase,
    private_chat: PrivateChatUseCase,
    group_chat: GroupChatUseCase,
    disconnect: DisconnectUseCase,
}

impl Router {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        session_cache: Arc<dyn SessionCache>,
        sessions: Arc<SessionRegistry>,
        groups: Arc<GroupRegistry>,
        connections: Arc<ConnectionRegistry>,
        session_ttl: Duration,
    ) -> Self {
        Self {
            account: AccountUseCase::new(credentials, session_cache, sessions.clone(), session_ttl),
            private_chat: PrivateChatUseCase::new(sessions.clone(), connections.clone()),
            group_chat: GroupChatUseCase::new(groups.clone(), connections.clone()),
            disconnect: DisconnectUseCase::new(sessions, groups, connections),
        }
    }

    /// Execute one command for the connection `handle`.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(reply))` - frame to send back to the caller
    /// * `Ok(None)` - nothing to send (fire-and-forget commands, dropped commands)
    /// * `Err(RouteError)` - a collaborator failed; the server must stop
    pub async fn dispatch(
        &self,
        handle: ConnectionHandle,
        session: &mut SessionState,
        command: Command,
    ) -> Result<Option<Reply>, RouteError> {
        let kind = command.kind();
        match command {
            Command::Cookie { token } => {
                let reply = self.account.lookup_cookie(handle, session, &token).await?;
                match &reply {
                    Reply::CookieFound(name) => {
                        tracing::info!("Session for '{}' resumed on {}", name, handle)
                    }
                    _ => tracing::info!("Cookie lookup on {} found nothing", handle),
                }
                Ok(Some(reply))
            }
            Command::Register { name, password } => {
                if self.account.register(&name, &password).await? {
                    tracing::info!("Registered '{}'", name);
                } else {
                    tracing::warn!("Registration for '{}' ignored: name already taken", name);
                }
                Ok(None)
            }
            Command::Login { name, password } => {
                let reply = self
                    .account
                    .login(handle, session, name.clone(), &password)
                    .await?;
                match &reply {
                    Reply::LoginAccepted(_) => tracing::info!("'{}' logged in on {}", name, handle),
                    _ => tracing::info!("Login for '{}' rejected", name),
                }
                Ok(Some(reply))
            }
            Command::Target { target, from } => {
                let Some(sender) = logged_in(handle, session, kind) else {
                    return Ok(None);
                };
                if from != sender {
                    tracing::debug!("'{}' selected a target claiming to be '{}'", sender, from);
                }
                match self.private_chat.select_target(session, target.clone()).await {
                    Some(target_handle) => tracing::info!(
                        "'{}' opened a private chat with '{}' ({})",
                        sender,
                        target,
                        target_handle
                    ),
                    None => tracing::info!(
                        "'{}' selected '{}', who is not online yet",
                        sender,
                        target
                    ),
                }
                Ok(None)
            }
            Command::Content { body } => {
                let Some(sender) = logged_in(handle, session, kind) else {
                    return Ok(None);
                };
                match self.private_chat.send(session, &sender, &body).await {
                    Ok(target_handle) => {
                        tracing::info!("'{}' -> {}: private message", sender, target_handle)
                    }
                    Err(e) => tracing::warn!("Private message from '{}' dropped: {}", sender, e),
                }
                Ok(None)
            }
            Command::Group { group_id } => {
                let Some(sender) = logged_in(handle, session, kind) else {
                    return Ok(None);
                };
                let joined = self.group_chat.join(handle, session, group_id).await;
                tracing::info!(
                    "'{}' {} group {}",
                    sender,
                    if joined { "joined" } else { "is already in" },
                    group_id
                );
                Ok(None)
            }
            Command::GroupMessage { body } => {
                let Some(sender) = logged_in(handle, session, kind) else {
                    return Ok(None);
                };
                match self.group_chat.broadcast(handle, session, &sender, &body).await {
                    Ok(delivered) => tracing::info!(
                        "'{}' broadcast to {} member(s) of group {:?}",
                        sender,
                        delivered,
                        session.group_id
                    ),
                    Err(e) => tracing::warn!("Group message from '{}' dropped: {}", sender, e),
                }
                Ok(None)
            }
        }
    }

    /// Release everything the connection `handle` holds in the registries.
    pub async fn disconnect(
        &self,
        handle: ConnectionHandle,
        session: &SessionState,
    ) -> DisconnectSummary {
        self.disconnect.execute(handle, session).await
    }
}

/// Login name of an authenticated session; otherwise the command is dropped.
fn logged_in(handle: ConnectionHandle, session: &SessionState, kind: &str) -> Option<LoginName> {
    let sender = session.sender().cloned();
    if sender.is_none() {
        tracing::warn!("Dropping '{}' from {}: connection is not logged in", kind, handle);
    }
    sender
}

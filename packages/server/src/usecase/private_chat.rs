//! UseCase: 1 対 1 のプライベートチャット
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - PrivateChatUseCase::select_target() / send()
//!
//! ### なぜこのテストが必要か
//! - 宛先にだけ `[送信者]:本文` が届くこと
//! - キャッシュした宛先ハンドルが古くなった場合に名前から一度だけ引き直すこと
//!
//! ### どのような状況を想定しているか
//! - 正常系：オンラインの宛先への送信
//! - 異常系：宛先未選択、宛先オフライン
//! - エッジケース：宛先の再ログイン（古いハンドル）

use std::sync::Arc;

use crate::{
    domain::{ConnectionHandle, LoginName, MessageBody, SessionState, relay_frame},
    infrastructure::registry::{ConnectionRegistry, SessionRegistry},
};

use super::error::SendMessageError;

/// プライベートチャットのユースケース
pub struct PrivateChatUseCase {
    sessions: Arc<SessionRegistry>,
    connections: Arc<ConnectionRegistry>,
}

impl PrivateChatUseCase {
    /// 新しい PrivateChatUseCase を作成
    pub fn new(sessions: Arc<SessionRegistry>, connections: Arc<ConnectionRegistry>) -> Self {
        Self {
            sessions,
            connections,
        }
    }

    /// 宛先を選択
    ///
    /// 宛先がオンラインであればそのハンドルをキャッシュする。
    /// オフラインの場合も名前は記録し、送信時に引き直す。
    pub async fn select_target(
        &self,
        session: &mut SessionState,
        target: LoginName,
    ) -> Option<ConnectionHandle> {
        let handle = self.sessions.get(&target).await;
        session.select_target(target, handle);
        handle
    }

    /// 選択中の宛先へメッセージを送信
    ///
    /// キャッシュしたハンドルへの配送に失敗した場合、Session Registry から
    /// 名前で一度だけ引き直して再送する。
    ///
    /// # Returns
    ///
    /// * `Ok(ConnectionHandle)` - 配送先のハンドル
    /// * `Err(SendMessageError)` - 宛先未選択・オフライン（送信者には通知しない）
    pub async fn send(
        &self,
        session: &mut SessionState,
        sender: &LoginName,
        body: &MessageBody,
    ) -> Result<ConnectionHandle, SendMessageError> {
        let target = session
            .target_name
            .clone()
            .ok_or(SendMessageError::NoTargetSelected)?;
        let frame = relay_frame(sender, body);

        if let Some(cached) = session.target_handle {
            match self.connections.deliver(cached, frame.clone()).await {
                Ok(()) => return Ok(cached),
                Err(e) => {
                    tracing::debug!("Cached target for '{}' is stale: {}", target, e);
                    session.target_handle = None;
                }
            }
        }

        // One re-resolution by name, no further retries.
        let resolved = self
            .sessions
            .get(&target)
            .await
            .ok_or_else(|| SendMessageError::TargetOffline(target.clone()))?;
        self.connections
            .deliver(resolved, frame)
            .await
            .map_err(|_| SendMessageError::TargetOffline(target))?;
        session.target_handle = Some(resolved);
        Ok(resolved)
    }
}

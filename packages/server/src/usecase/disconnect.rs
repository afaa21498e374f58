//! UseCase: 接続終了処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectUseCase::execute() メソッド
//! - 切断時のレジストリ掃除（接続・セッション・グループ）
//!
//! ### なぜこのテストが必要か
//! - 切断済みの接続がレジストリに残り続けないこと
//! - 同名で後からログインした接続のエントリを消さないこと
//!
//! ### どのような状況を想定しているか
//! - 正常系：ログイン済み・グループ参加済みの接続の切断
//! - エッジケース：同名の新しい接続が存在する場合、未ログインの接続の切断

use std::sync::Arc;

use parlor_shared::time::get_jst_timestamp;

use crate::{
    domain::{ConnectionHandle, SessionState},
    infrastructure::registry::{ConnectionRegistry, GroupRegistry, SessionRegistry},
};

/// 切断処理の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisconnectSummary {
    /// Session Registry からこの接続の名前を削除したか
    pub released_name: bool,
    /// 離脱したグループ数
    pub groups_left: usize,
    /// 接続していた時間（ミリ秒）。既に閉じられていた場合は None
    pub connected_for_ms: Option<i64>,
}

/// 接続終了のユースケース
pub struct DisconnectUseCase {
    sessions: Arc<SessionRegistry>,
    groups: Arc<GroupRegistry>,
    connections: Arc<ConnectionRegistry>,
}

impl DisconnectUseCase {
    /// 新しい DisconnectUseCase を作成
    pub fn new(
        sessions: Arc<SessionRegistry>,
        groups: Arc<GroupRegistry>,
        connections: Arc<ConnectionRegistry>,
    ) -> Self {
        Self {
            sessions,
            groups,
            connections,
        }
    }

    /// 切断を実行
    ///
    /// 1. Connection Registry からハンドルを削除（以後の配送は失敗する）
    /// 2. Session Registry の名前がまだこの接続を指していれば削除
    /// 3. 全グループから離脱
    ///
    /// Session Cache のトークンは TTL まで有効なまま残す。
    pub async fn execute(
        &self,
        handle: ConnectionHandle,
        session: &SessionState,
    ) -> DisconnectSummary {
        let connected_for_ms = self
            .connections
            .close(handle)
            .await
            .map(|info| get_jst_timestamp() - info.connected_at);

        let released_name = match &session.login_name {
            Some(name) => self.sessions.remove_if(name, handle).await,
            None => false,
        };
        let groups_left = self.groups.leave_all(handle).await;

        DisconnectSummary {
            released_name,
            groups_left,
            connected_for_ms,
        }
    }
}

//! UseCase: グループチャット（参加・ブロードキャスト）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - GroupChatUseCase::join() / broadcast()
//!
//! ### なぜこのテストが必要か
//! - 送信者以外のグループメンバーにだけ届くこと
//! - 重複参加してもメッセージが一度しか届かないこと
//! - 閉じた接続への配送失敗が他のメンバーへの配送を妨げないこと

use std::sync::Arc;

use crate::{
    domain::{ConnectionHandle, GroupId, LoginName, MessageBody, SessionState, relay_frame},
    infrastructure::registry::{ConnectionRegistry, GroupRegistry},
};

use super::error::SendMessageError;

/// グループチャットのユースケース
pub struct GroupChatUseCase {
    groups: Arc<GroupRegistry>,
    connections: Arc<ConnectionRegistry>,
}

impl GroupChatUseCase {
    /// 新しい GroupChatUseCase を作成
    pub fn new(groups: Arc<GroupRegistry>, connections: Arc<ConnectionRegistry>) -> Self {
        Self {
            groups,
            connections,
        }
    }

    /// グループに参加し、セッションの現在のグループにする
    ///
    /// 以前のグループのメンバーシップはそのまま残る。
    ///
    /// # Returns
    ///
    /// 新規参加なら `true`、既にメンバーなら `false`
    pub async fn join(
        &self,
        handle: ConnectionHandle,
        session: &mut SessionState,
        group_id: GroupId,
    ) -> bool {
        session.group_id = Some(group_id);
        self.groups.join(group_id, handle).await
    }

    /// 現在のグループの送信者以外の全メンバーへ送信
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - 配送できたメンバー数
    /// * `Err(SendMessageError)` - 未参加・他のメンバーなし
    pub async fn broadcast(
        &self,
        handle: ConnectionHandle,
        session: &SessionState,
        sender: &LoginName,
        body: &MessageBody,
    ) -> Result<usize, SendMessageError> {
        let group_id = session.group_id.ok_or(SendMessageError::NoGroupJoined)?;

        // Snapshot taken under the group lock; delivery happens after it is released.
        let members = self.groups.members_except(group_id, handle).await;
        if members.is_empty() {
            return Err(SendMessageError::NoRecipients(group_id));
        }

        let frame = relay_frame(sender, body);
        let mut delivered = 0;
        for member in members {
            match self.connections.deliver(member, frame.clone()).await {
                Ok(()) => delivered += 1,
                Err(e) => tracing::warn!("Group {} delivery failed: {}", group_id, e),
            }
        }
        Ok(delivered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    struct Fixture {
        usecase: GroupChatUseCase,
        groups: Arc<GroupRegistry>,
        connections: Arc<ConnectionRegistry>,
    }

    fn create_fixture() -> Fixture {
        let groups = Arc::new(GroupRegistry::new());
        let connections = Arc::new(ConnectionRegistry::new());
        Fixture {
            usecase: GroupChatUseCase::new(groups.clone(), connections.clone()),
            groups,
            connections,
        }
    }

    fn name(s: &str) -> LoginName {
        LoginName::new(s.to_string()).unwrap()
    }

    fn body(s: &str) -> MessageBody {
        MessageBody::new(s.to_string()).unwrap()
    }

    async fn connect(fixture: &Fixture) -> (ConnectionHandle, UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (fixture.connections.open(tx).await, rx)
    }

    #[tokio::test]
    async fn test_broadcast_excludes_sender() {
        // テスト項目: ブロードキャストは送信者以外のメンバーにだけ届く
        // given (前提条件):
        let fixture = create_fixture();
        let group = GroupId::new(42);
        let (alice, mut alice_rx) = connect(&fixture).await;
        let (bob, mut bob_rx) = connect(&fixture).await;
        let (_outsider, mut outsider_rx) = connect(&fixture).await;
        let mut alice_session = SessionState::new();
        let mut bob_session = SessionState::new();
        fixture.usecase.join(alice, &mut alice_session, group).await;
        fixture.usecase.join(bob, &mut bob_session, group).await;

        // when (操作):
        let result = fixture
            .usecase
            .broadcast(alice, &alice_session, &name("alice"), &body("hello"))
            .await;

        // then (期待する結果):
        assert_eq!(result, Ok(1));
        assert_eq!(bob_rx.try_recv().unwrap(), "[alice]:hello");
        assert!(alice_rx.try_recv().is_err());
        assert!(outsider_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_repeated_join_delivers_once() {
        // テスト項目: 同じグループに二度参加しても、メッセージは一度だけ届く
        // given (前提条件):
        let fixture = create_fixture();
        let group = GroupId::new(42);
        let (alice, _alice_rx) = connect(&fixture).await;
        let (bob, mut bob_rx) = connect(&fixture).await;
        let mut alice_session = SessionState::new();
        let mut bob_session = SessionState::new();
        fixture.usecase.join(alice, &mut alice_session, group).await;
        let first = fixture.usecase.join(bob, &mut bob_session, group).await;
        let second = fixture.usecase.join(bob, &mut bob_session, group).await;

        // when (操作):
        fixture
            .usecase
            .broadcast(alice, &alice_session, &name("alice"), &body("once"))
            .await
            .unwrap();

        // then (期待する結果):
        assert!(first);
        assert!(!second);
        assert_eq!(fixture.groups.member_count(group).await, 2);
        assert_eq!(bob_rx.try_recv().unwrap(), "[alice]:once");
        assert!(bob_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_broadcast_without_group_is_dropped() {
        // テスト項目: グループ未参加のブロードキャストは NoGroupJoined で破棄される
        // given (前提条件):
        let fixture = create_fixture();
        let (alice, _alice_rx) = connect(&fixture).await;

        // when (操作):
        let result = fixture
            .usecase
            .broadcast(alice, &SessionState::new(), &name("alice"), &body("anyone?"))
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(SendMessageError::NoGroupJoined));
    }

    #[tokio::test]
    async fn test_broadcast_alone_is_dropped() {
        // テスト項目: 自分しかいないグループへのブロードキャストは NoRecipients になる
        // given (前提条件):
        let fixture = create_fixture();
        let (alice, _alice_rx) = connect(&fixture).await;
        let mut session = SessionState::new();
        fixture.usecase.join(alice, &mut session, GroupId::new(7)).await;

        // when (操作):
        let result = fixture
            .usecase
            .broadcast(alice, &session, &name("alice"), &body("echo"))
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(SendMessageError::NoRecipients(GroupId::new(7))));
    }

    #[tokio::test]
    async fn test_closed_member_does_not_block_others() {
        // テスト項目: 閉じた接続への配送失敗があっても他のメンバーには届く
        // given (前提条件):
        let fixture = create_fixture();
        let group = GroupId::new(42);
        let (alice, _alice_rx) = connect(&fixture).await;
        let (gone, _gone_rx) = connect(&fixture).await;
        let (carol, mut carol_rx) = connect(&fixture).await;
        let mut alice_session = SessionState::new();
        fixture.usecase.join(alice, &mut alice_session, group).await;
        for handle in [gone, carol] {
            fixture
                .usecase
                .join(handle, &mut SessionState::new(), group)
                .await;
        }
        fixture.connections.close(gone).await;

        // when (操作):
        let result = fixture
            .usecase
            .broadcast(alice, &alice_session, &name("alice"), &body("hi all"))
            .await;

        // then (期待する結果):
        assert_eq!(result, Ok(1));
        assert_eq!(carol_rx.try_recv().unwrap(), "[alice]:hi all");
    }
}

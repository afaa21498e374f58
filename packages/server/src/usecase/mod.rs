//! UseCase 層
//!
//! コマンドごとの処理を実装するレイヤー。
//! UI 層（接続ハンドラ）から `Router` 経由で呼び出され、レジストリと
//! 外部ストア（Domain 層の trait）を操作します。

pub mod account;
pub mod disconnect;
pub mod error;
pub mod group_chat;
pub mod private_chat;
pub mod router;

pub use account::AccountUseCase;
pub use disconnect::{DisconnectSummary, DisconnectUseCase};
pub use error::{RouteError, SendMessageError};
pub use group_chat::GroupChatUseCase;
pub use private_chat::PrivateChatUseCase;
pub use router::Router;

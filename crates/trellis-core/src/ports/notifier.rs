//! Notifier port - fire-and-forget の publish/subscribe（NATS または InMemory）
//!
//! # 実装
//! - InMemoryNotifier: 開発・テスト用（impls 参照）
//! - 本番: NATS などへの接続を別クレートで実装

use std::sync::Arc;

use async_trait::async_trait;

/// subscribe 時に登録するハンドラ（payload bytes を受け取る）
pub type MessageHandler = Arc<dyn Fn(&[u8]) + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notifier is closed")]
    Closed,

    #[error("notifier unavailable: {0}")]
    Unavailable(String),
}

/// Notifier はトピック単位でメッセージを配信
///
/// # 設計原則
/// - 配信は at-most-once（再送しない、永続化しない）
/// - publish の失敗は呼び出し元の操作を失敗させない（repository 側で握りつぶす）
/// - `close()` の後の publish/subscribe は `NotifyError::Closed`
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn publish(&self, topic: &str, payload: &[u8]) -> Result<(), NotifyError>;

    async fn subscribe(&self, topic: &str, handler: MessageHandler) -> Result<(), NotifyError>;

    async fn close(&self) -> Result<(), NotifyError>;
}

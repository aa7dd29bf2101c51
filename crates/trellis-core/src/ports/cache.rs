//! CacheStore port - キー単位の get/set/delete（Redis または InMemory）
//!
//! 値は呼び出し側でシリアライズ済みの bytes です。
//! キーの組み立て（`"<kind>:<id>"` / `"posts"`）は repository の責務です。

use std::time::Duration;

use async_trait::async_trait;

/// CacheError は cache backend の失敗
///
/// repository はこれを呼び出し側に返しません（ログに残して捨てる）。
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache unavailable: {0}")]
    Unavailable(String),
}

/// CacheStore は TTL 付きのキー・バリューストア
///
/// # 設計原則
/// - 期限切れのエントリは存在しないものとして扱う
/// - 存在しないキーの delete はエラーではない
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// ヒットすれば `Some(bytes)`、ミス（期限切れ含む）なら `None`
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError>;

    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}

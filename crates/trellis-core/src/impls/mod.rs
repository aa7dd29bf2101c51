//! Impls - 実装（開発用・テスト用）
//!
//! このモジュールには ports の in-memory 実装を含めます。
//! どの実装も `set_available(false)` で障害を注入でき、
//! 呼び出し回数などのカウンタを持ちます（テストダブルとして使う）。
//!
//! # 含まれる実装
//! - **InMemoryCache**: TTL 付きキャッシュ（Clock 注入）
//! - **InMemorySearchIndex**: 簡易全文検索
//! - **InMemoryNotifier**: topic ごとの publish/subscribe
//! - **InMemoryStore**: primary store（IdGenerator 注入）
//!
//! # 本番用実装
//! 本番用の実装は別クレートに配置します：
//! - MongoDB: PrimaryStore
//! - Redis: CacheStore
//! - Elasticsearch: SearchIndex
//! - NATS: Notifier

pub mod inmem_cache;
pub mod inmem_notifier;
pub mod inmem_search;
pub mod inmem_store;

// 主要な型を再エクスポート
pub use self::inmem_cache::{CacheStats, InMemoryCache};
pub use self::inmem_notifier::InMemoryNotifier;
pub use self::inmem_search::InMemorySearchIndex;
pub use self::inmem_store::InMemoryStore;

//! Ports - 抽象化レイヤー
//!
//! このモジュールは Hexagonal Architecture の「ポート」を定義します。
//! 各 trait は外部システム（MongoDB, Redis, Elasticsearch, NATS など）への
//! インターフェースを提供し、実装の詳細を隠蔽します。
//!
//! # 設計原則
//! - PrimaryStore が source of truth（正本）
//! - CacheStore / SearchIndex は派生コピー（捨ててよい）
//! - Notifier は fire-and-forget

pub mod cache;
pub mod clock;
pub mod id_generator;
pub mod notifier;
pub mod primary_store;
pub mod search;

// 主要な trait を再エクスポート
pub use self::cache::{CacheError, CacheStore};
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::notifier::{MessageHandler, Notifier, NotifyError};
pub use self::primary_store::{InsertionResult, PrimaryStore, StoreError};
pub use self::search::{SearchError, SearchIndex};

//! trellis-core
//!
//! 1 つの primary store（正本）と、そこから派生する 3 つのストア
//! （キャッシュ・検索インデックス・変更通知）を整合させる repository 層。
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, entity, post, user, document, events, errors）
//! - **ports**: 抽象化レイヤー（PrimaryStore, CacheStore, SearchIndex, Notifier, Clock, IdGenerator）
//! - **impls**: 実装（InMemoryStore, InMemoryCache など開発用）
//! - **app**: アプリケーションロジック（builder, repository, service, config）
//!
//! # 整合性モデル
//! - PrimaryStore への書き込みが成功した時点で操作は成功
//! - キャッシュは TTL 付きの read-through、書き込み前に invalidate
//! - 検索インデックスと通知は best-effort（失敗はログのみ）

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;

//! App - アプリケーション層
//!
//! このモジュールは、ports を組み合わせてアプリケーションロジックを実装します。
//!
//! # 主要コンポーネント
//! - **AppBuilder**: アプリケーションの構築とワイヤリング
//! - **EntityRepository**: read-through キャッシュと書き込み時の副作用
//! - **EntityService**: 文字列 ID のパースと検索クエリの正規化
//! - **RepositoryConfig**: キャッシュ TTL などの設定

pub mod builder;
pub mod config;
pub mod repository;
pub mod service;

// 主要な型を再エクスポート
pub use self::builder::{App, AppBuilder, BuildError};
pub use self::config::RepositoryConfig;
pub use self::repository::{EntityRepository, Ports};
pub use self::service::{EntityService, PostService, UserService};

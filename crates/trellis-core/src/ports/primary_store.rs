//! PrimaryStore port - エンティティ種別ごとの正本（source of truth）
//!
//! PrimaryStore は以下を管理します：
//! - エンティティの権威ある値
//! - EntityID の採番（insert 時）
//!
//! # 実装
//! - InMemoryStore: 開発・テスト用（impls 参照）
//! - 本番: MongoDB などのドライバを別クレートで実装

use async_trait::async_trait;

use crate::domain::entity::Entity;
use crate::domain::errors::RepositoryError;
use crate::domain::ids::{Id, IdMarker};

/// StoreError は primary store の失敗
///
/// repository はこれをそのまま（RepositoryError に変換して）呼び出し側に返します。
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{kind} not found: id={id}")]
    NotFound { kind: &'static str, id: String },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn not_found<T: IdMarker>(id: Id<T>) -> Self {
        StoreError::NotFound {
            kind: T::KIND,
            id: id.to_string(),
        }
    }
}

impl From<StoreError> for RepositoryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { kind, id } => RepositoryError::NotFound { kind, id },
            StoreError::Unavailable(reason) => {
                RepositoryError::store_unavailable(reason.clone(), StoreError::Unavailable(reason))
            }
        }
    }
}

/// insert の結果（採番された ID）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertionResult<T: IdMarker> {
    pub id: Id<T>,
}

/// PrimaryStore は 1 つのエンティティ種別の CRUD
///
/// # 設計原則
/// - `update()` は全フィールドを置き換える（`Entity::replace` の意味論）
/// - `partial_update()` は空でないフィールドだけを反映する（`Entity::patch` の意味論）
/// - どちらも書き込み後の値を返す（find-and-modify 相当）
/// - 存在しない ID は `StoreError::NotFound`
#[async_trait]
pub trait PrimaryStore<E: Entity>: Send + Sync {
    async fn list(&self) -> Result<Vec<E>, StoreError>;

    async fn get_by_id(&self, id: Id<E::Marker>) -> Result<E, StoreError>;

    async fn insert(&self, fields: &E::Fields) -> Result<InsertionResult<E::Marker>, StoreError>;

    async fn update(&self, id: Id<E::Marker>, fields: &E::Fields) -> Result<E, StoreError>;

    async fn partial_update(&self, id: Id<E::Marker>, fields: &E::Fields) -> Result<E, StoreError>;

    async fn delete(&self, id: Id<E::Marker>) -> Result<(), StoreError>;
}

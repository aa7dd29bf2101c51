//! EntityRepository - primary store と派生ストアの整合を取る中核
//!
//! # 学習ポイント
//! - read-through キャッシュ（miss 時だけ primary store を読む）
//! - 書き込み前の invalidate（古い値を読ませないため）
//! - best-effort な副作用（失敗はログに残して捨てる）
//!
//! # 書き込みの流れ
//! ```text
//! Create:        insert → invalidate(collection) → index → publish(added)
//! Update/Patch:  invalidate(entity, collection) → update → index → publish(updated)
//! Delete:        invalidate(entity, collection) → delete → unindex → publish(deleted)
//! ```
//!
//! primary store の失敗だけが呼び出し側に返ります。
//! primary store が失敗したら後続の副作用は一切実行しません。

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::app::config::RepositoryConfig;
use crate::domain::document::SearchHit;
use crate::domain::entity::Entity;
use crate::domain::errors::RepositoryError;
use crate::domain::events::{ChangeKind, Event};
use crate::domain::ids::Id;
use crate::ports::{CacheStore, Notifier, PrimaryStore, SearchIndex};

/// Ports は全エンティティ種別で共有する派生ストアの束
///
/// プロセスが所有し、各 repository にコンストラクタで渡します。
#[derive(Clone)]
pub struct Ports {
    pub cache: Arc<dyn CacheStore>,
    pub search: Arc<dyn SearchIndex>,
    pub notifier: Arc<dyn Notifier>,
}

/// Update と Patch の違い（primary store のどちらの操作を呼ぶか）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteMode {
    Replace,
    Patch,
}

/// EntityRepository は 1 つのエンティティ種別の読み書き
///
/// # 使用例
/// ```ignore
/// let repo = EntityRepository::<Post>::new(store, ports, RepositoryConfig::default());
/// let post = repo.create(PostFields::new("A", "B")).await?;
/// let same = repo.read(post.id).await?; // 2 回目以降はキャッシュから
/// ```
pub struct EntityRepository<E: Entity> {
    store: Arc<dyn PrimaryStore<E>>,
    ports: Ports,
    config: RepositoryConfig,
}

impl<E: Entity> EntityRepository<E> {
    pub fn new(store: Arc<dyn PrimaryStore<E>>, ports: Ports, config: RepositoryConfig) -> Self {
        Self {
            store,
            ports,
            config,
        }
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    /// 全件取得（コレクションキーで read-through）
    pub async fn read_all(&self) -> Result<Vec<E>, RepositoryError> {
        let key = E::collection();
        if let Some(entities) = self.cache_get::<Vec<E>>(key).await {
            return Ok(entities);
        }

        let entities = self.store.list().await?;
        self.cache_put(key, &entities).await;
        Ok(entities)
    }

    /// 1 件取得（エンティティキーで read-through）
    ///
    /// NotFound はキャッシュしません。
    pub async fn read(&self, id: Id<E::Marker>) -> Result<E, RepositoryError> {
        let key = id.cache_key();
        if let Some(entity) = self.cache_get::<E>(&key).await {
            return Ok(entity);
        }

        let entity = self.store.get_by_id(id).await?;
        self.cache_put(&key, &entity).await;
        Ok(entity)
    }

    /// 新規作成
    ///
    /// primary store への insert が成功した時点で成功です。
    pub async fn create(&self, fields: E::Fields) -> Result<E, RepositoryError> {
        let inserted = self.store.insert(&fields).await?;
        let entity = E::from_fields(inserted.id, fields);

        self.invalidate(E::collection()).await;
        self.index_document(&entity).await;
        self.publish(ChangeKind::Added, inserted.id).await;

        info!(entity = E::kind(), id = %inserted.id, "created");
        Ok(entity)
    }

    /// 全フィールドを置き換える（空文字はクリア）
    pub async fn update(&self, id: Id<E::Marker>, fields: E::Fields) -> Result<E, RepositoryError> {
        self.write(id, fields, WriteMode::Replace).await
    }

    /// 空でないフィールドだけを反映する
    pub async fn patch(&self, id: Id<E::Marker>, fields: E::Fields) -> Result<E, RepositoryError> {
        self.write(id, fields, WriteMode::Patch).await
    }

    pub async fn delete(&self, id: Id<E::Marker>) -> Result<(), RepositoryError> {
        self.invalidate(&id.cache_key()).await;
        self.invalidate(E::collection()).await;

        self.store.delete(id).await?;

        self.remove_document(id).await;
        self.publish(ChangeKind::Deleted, id).await;

        info!(entity = E::kind(), id = %id, "deleted");
        Ok(())
    }

    /// 検索インデックスだけを引く（primary store もキャッシュも見ない）
    pub async fn search(&self, query: &str) -> Result<Vec<SearchHit>, RepositoryError> {
        let hits = self
            .ports
            .search
            .query(E::collection(), query)
            .await?;

        debug!(entity = E::kind(), query, hits = hits.len(), "search");
        Ok(hits)
    }

    async fn write(
        &self,
        id: Id<E::Marker>,
        fields: E::Fields,
        mode: WriteMode,
    ) -> Result<E, RepositoryError> {
        self.invalidate(&id.cache_key()).await;
        self.invalidate(E::collection()).await;

        let updated = match mode {
            WriteMode::Replace => self.store.update(id, &fields).await?,
            WriteMode::Patch => self.store.partial_update(id, &fields).await?,
        };

        self.index_document(&updated).await;
        self.publish(ChangeKind::Updated, id).await;

        info!(entity = E::kind(), id = %id, mode = ?mode, "updated");
        Ok(updated)
    }

    // ========================================
    // best-effort な副作用
    // ========================================

    /// 壊れたエントリは miss として扱う
    async fn cache_get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.ports.cache.get(key).await {
            Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
                Ok(value) => {
                    debug!(entity = E::kind(), key, "cache hit");
                    Some(value)
                }
                Err(error) => {
                    warn!(entity = E::kind(), key, %error, "corrupt cache entry");
                    None
                }
            },
            Ok(None) => {
                debug!(entity = E::kind(), key, "cache miss");
                None
            }
            Err(error) => {
                warn!(entity = E::kind(), key, %error, "cache get failed");
                None
            }
        }
    }

    async fn cache_put<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let bytes = match serde_json::to_vec(value) {
            Ok(bytes) => bytes,
            Err(error) => {
                warn!(entity = E::kind(), key, %error, "cache encode failed");
                return;
            }
        };

        match self.ports.cache.set(key, bytes, self.config.cache_ttl()).await {
            Ok(()) => debug!(entity = E::kind(), key, "cache populated"),
            Err(error) => warn!(entity = E::kind(), key, %error, "cache set failed"),
        }
    }

    async fn invalidate(&self, key: &str) {
        match self.ports.cache.delete(key).await {
            Ok(()) => debug!(entity = E::kind(), key, "cache invalidated"),
            Err(error) => warn!(entity = E::kind(), key, %error, "cache invalidate failed"),
        }
    }

    async fn index_document(&self, entity: &E) {
        let id = entity.id();
        let document_id = id.to_string();
        let result = self
            .ports
            .search
            .index(E::collection(), &document_id, &entity.search_fields())
            .await;

        match result {
            Ok(()) => debug!(entity = E::kind(), id = %id, "indexed"),
            Err(error) => warn!(entity = E::kind(), id = %id, %error, "index failed"),
        }
    }

    async fn remove_document(&self, id: Id<E::Marker>) {
        let document_id = id.to_string();
        match self.ports.search.delete(E::collection(), &document_id).await {
            Ok(()) => debug!(entity = E::kind(), id = %id, "unindexed"),
            Err(error) => warn!(entity = E::kind(), id = %id, %error, "unindex failed"),
        }
    }

    async fn publish(&self, change: ChangeKind, id: Id<E::Marker>) {
        let event = Event::entity(change, id);
        match self.ports.notifier.publish(&event.topic, &event.payload).await {
            Ok(()) => debug!(topic = %event.topic, id = %id, "published"),
            Err(error) => warn!(topic = %event.topic, id = %id, %error, "publish failed"),
        }
    }
}

//! InMemoryStore - 開発用の primary store
//!
//! # 学習ポイント
//! - ジェネリックな port 実装（`PrimaryStore<E>` を全 Entity に対して 1 回だけ実装）
//! - IdGenerator の注入による採番
//! - 呼び出し回数のカウント（read-through の検証に使う）

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::entity::Entity;
use crate::domain::ids::Id;
use crate::ports::{
    IdGenerator, InsertionResult, PrimaryStore, StoreError, SystemClock, UlidGenerator,
};

/// in-memory store の状態
struct StoreState<E: Entity> {
    /// 全レコード（正本）
    records: HashMap<Id<E::Marker>, E>,
    /// 挿入順（list の順序）
    order: Vec<Id<E::Marker>>,
}

impl<E: Entity> StoreState<E> {
    fn new() -> Self {
        Self {
            records: HashMap::new(),
            order: Vec::new(),
        }
    }
}

/// InMemoryStore は開発・テスト用の PrimaryStore
///
/// # 使用例
/// ```ignore
/// let store: Arc<InMemoryStore<Post>> = Arc::new(InMemoryStore::new());
/// let inserted = store.insert(&PostFields::new("A", "B")).await?;
/// let post = store.get_by_id(inserted.id).await?;
/// ```
pub struct InMemoryStore<E: Entity, G = UlidGenerator<SystemClock>> {
    state: Mutex<StoreState<E>>,
    id_gen: G,
    reads: AtomicUsize,
    writes: AtomicUsize,
    available: AtomicBool,
}

impl<E: Entity> InMemoryStore<E> {
    pub fn new() -> Self {
        Self::with_id_generator(UlidGenerator::new(SystemClock))
    }
}

impl<E: Entity> Default for InMemoryStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity, G: IdGenerator> InMemoryStore<E, G> {
    pub fn with_id_generator(id_gen: G) -> Self {
        Self {
            state: Mutex::new(StoreState::new()),
            id_gen,
            reads: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
            available: AtomicBool::new(true),
        }
    }

    /// false にすると全操作が `StoreError::Unavailable` を返す
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// list / get_by_id の呼び出し回数（失敗も含む）
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// insert / update / partial_update / delete の呼び出し回数（失敗も含む）
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn enter(&self, counter: &AtomicUsize) -> Result<(), StoreError> {
        counter.fetch_add(1, Ordering::SeqCst);
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable(format!(
                "in-memory {} store disabled",
                E::kind()
            )))
        }
    }

    async fn modify(
        &self,
        id: Id<E::Marker>,
        apply: impl FnOnce(&mut E) + Send,
    ) -> Result<E, StoreError> {
        self.enter(&self.writes)?;
        let mut state = self.state.lock().await;
        let record = state
            .records
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found(id))?;
        apply(record);
        Ok(record.clone())
    }
}

#[async_trait]
impl<E: Entity, G: IdGenerator> PrimaryStore<E> for InMemoryStore<E, G> {
    async fn list(&self) -> Result<Vec<E>, StoreError> {
        self.enter(&self.reads)?;
        let state = self.state.lock().await;
        Ok(state
            .order
            .iter()
            .filter_map(|id| state.records.get(id).cloned())
            .collect())
    }

    async fn get_by_id(&self, id: Id<E::Marker>) -> Result<E, StoreError> {
        self.enter(&self.reads)?;
        let state = self.state.lock().await;
        state
            .records
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(id))
    }

    async fn insert(&self, fields: &E::Fields) -> Result<InsertionResult<E::Marker>, StoreError> {
        self.enter(&self.writes)?;
        let id = self.id_gen.generate::<E::Marker>();
        let entity = E::from_fields(id, fields.clone());

        let mut state = self.state.lock().await;
        state.records.insert(id, entity);
        state.order.push(id);
        Ok(InsertionResult { id })
    }

    async fn update(&self, id: Id<E::Marker>, fields: &E::Fields) -> Result<E, StoreError> {
        let fields = fields.clone();
        self.modify(id, move |record| record.replace(fields)).await
    }

    async fn partial_update(&self, id: Id<E::Marker>, fields: &E::Fields) -> Result<E, StoreError> {
        let fields = fields.clone();
        self.modify(id, move |record| record.patch(fields)).await
    }

    async fn delete(&self, id: Id<E::Marker>) -> Result<(), StoreError> {
        self.enter(&self.writes)?;
        let mut state = self.state.lock().await;
        if state.records.remove(&id).is_none() {
            return Err(StoreError::not_found(id));
        }
        state.order.retain(|existing| *existing != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Post, PostFields, PostId, User, UserFields};
    use crate::ports::FixedClock;
    use chrono::{TimeZone, Utc};
    use ulid::Ulid;

    #[tokio::test]
    async fn insert_assigns_id_and_lists_in_order() {
        let store = InMemoryStore::<Post>::new();
        let first = store.insert(&PostFields::new("one", "1")).await.unwrap();
        let second = store.insert(&PostFields::new("two", "2")).await.unwrap();

        let posts = store.list().await.unwrap();
        let ids: Vec<PostId> = posts.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
        assert_eq!(posts[0].title, "one");
        assert_eq!(store.writes(), 2);
        assert_eq!(store.reads(), 1);
    }

    #[tokio::test]
    async fn ids_come_from_injected_generator() {
        let fixed_time = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let store = InMemoryStore::<User, _>::with_id_generator(UlidGenerator::new(
            FixedClock::new(fixed_time),
        ));

        let inserted = store
            .insert(&UserFields::new("Ada", "ada", "ada@example.com"))
            .await
            .unwrap();
        assert_eq!(
            inserted.id.as_ulid().timestamp_ms(),
            fixed_time.timestamp_millis() as u64
        );
    }

    #[tokio::test]
    async fn update_replaces_and_partial_update_patches() {
        let store = InMemoryStore::<Post>::new();
        let id = store
            .insert(&PostFields::new("A", "B").with_author("alice"))
            .await
            .unwrap()
            .id;

        let patched = store
            .partial_update(id, &PostFields::new("", "patched"))
            .await
            .unwrap();
        assert_eq!((patched.title.as_str(), patched.body.as_str()), ("A", "patched"));
        assert_eq!(patched.author, "alice");

        let replaced = store.update(id, &PostFields::new("", "replaced")).await.unwrap();
        assert_eq!((replaced.title.as_str(), replaced.body.as_str()), ("", "replaced"));
        assert_eq!(replaced.author, "");

        assert_eq!(store.get_by_id(id).await.unwrap(), replaced);
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let store = InMemoryStore::<Post>::new();
        let id = PostId::from_ulid(Ulid::new());

        assert!(matches!(store.get_by_id(id).await, Err(StoreError::NotFound { .. })));
        assert!(matches!(
            store.update(id, &PostFields::default()).await,
            Err(StoreError::NotFound { .. })
        ));
        assert!(matches!(store.delete(id).await, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn delete_removes_from_list() {
        let store = InMemoryStore::<Post>::new();
        let keep = store.insert(&PostFields::new("keep", "")).await.unwrap().id;
        let drop = store.insert(&PostFields::new("drop", "")).await.unwrap().id;

        store.delete(drop).await.unwrap();

        let posts = store.list().await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id, keep);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn unavailable_store_counts_the_attempt() {
        let store = InMemoryStore::<Post>::new();
        store.set_available(false);

        let err = store.list().await.unwrap_err();
        assert_eq!(err.to_string(), "store unavailable: in-memory post store disabled");
        assert_eq!(store.reads(), 1);
        assert!(store.insert(&PostFields::default()).await.is_err());
        assert!(store.is_empty().await);
    }
}

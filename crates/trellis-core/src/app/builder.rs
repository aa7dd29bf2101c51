//! AppBuilder - アプリケーションの構築とワイヤリング
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）
//! - 開発体験の改善（明確なエラーメッセージ）

use std::sync::Arc;

use crate::app::config::RepositoryConfig;
use crate::app::repository::{EntityRepository, Ports};
use crate::app::service::EntityService;
use crate::domain::entity::Entity;
use crate::ports::{CacheStore, Notifier, PrimaryStore, SearchIndex};

/// AppBuilder はアプリケーションを構築
///
/// # 使用例
/// ```ignore
/// let app = AppBuilder::new()
///     .cache(Arc::new(InMemoryCache::new()))
///     .search(Arc::new(InMemorySearchIndex::new()))
///     .notifier(Arc::new(InMemoryNotifier::new()))
///     .config(RepositoryConfig::default())
///     .build()?;
/// let posts = app.service::<Post>(post_store);
/// ```
///
/// # Fail-fast 設計
/// - 派生ストア（cache / search / notifier）は全て必須
/// - build() 時に未設定の port をまとめて BuildError で返す
/// - config は省略可（既定値を使う）
pub struct AppBuilder {
    cache: Option<Arc<dyn CacheStore>>,
    search: Option<Arc<dyn SearchIndex>>,
    notifier: Option<Arc<dyn Notifier>>,
    config: RepositoryConfig,
}

/// BuildError はアプリケーション構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Missing ports: {0:?}. These ports must be provided before build().")]
    MissingPorts(Vec<&'static str>),
}

impl AppBuilder {
    /// 新しい AppBuilder を作成
    pub fn new() -> Self {
        Self {
            cache: None,
            search: None,
            notifier: None,
            config: RepositoryConfig::default(),
        }
    }

    pub fn cache(mut self, cache: Arc<dyn CacheStore>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn search(mut self, search: Arc<dyn SearchIndex>) -> Self {
        self.search = Some(search);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn config(mut self, config: RepositoryConfig) -> Self {
        self.config = config;
        self
    }

    /// AppBuilder を構築して App を生成
    ///
    /// # 検証
    /// - cache / search / notifier が全て設定されているかチェック
    /// - 不足があれば BuildError::MissingPorts を返す
    pub fn build(self) -> Result<App, BuildError> {
        match (self.cache, self.search, self.notifier) {
            (Some(cache), Some(search), Some(notifier)) => Ok(App {
                ports: Ports {
                    cache,
                    search,
                    notifier,
                },
                config: self.config,
            }),
            (cache, search, notifier) => {
                let missing = [
                    ("cache", cache.is_none()),
                    ("search", search.is_none()),
                    ("notifier", notifier.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, is_missing)| is_missing.then_some(name))
                .collect();
                Err(BuildError::MissingPorts(missing))
            }
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// App はワイヤリング済みの port 一式
///
/// エンティティ種別ごとの primary store を渡すと、
/// 共有の Ports を持った repository / service を返します。
#[derive(Clone)]
pub struct App {
    ports: Ports,
    config: RepositoryConfig,
}

impl App {
    pub fn ports(&self) -> &Ports {
        &self.ports
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    pub fn repository<E: Entity>(&self, store: Arc<dyn PrimaryStore<E>>) -> EntityRepository<E> {
        EntityRepository::new(store, self.ports.clone(), self.config)
    }

    pub fn service<E: Entity>(&self, store: Arc<dyn PrimaryStore<E>>) -> EntityService<E> {
        EntityService::new(self.repository(store))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Post, PostFields};
    use crate::impls::{InMemoryCache, InMemoryNotifier, InMemorySearchIndex, InMemoryStore};
    use std::time::Duration;

    fn complete_builder() -> AppBuilder {
        AppBuilder::new()
            .cache(Arc::new(InMemoryCache::new()))
            .search(Arc::new(InMemorySearchIndex::new()))
            .notifier(Arc::new(InMemoryNotifier::new()))
    }

    #[test]
    fn test_build_success() {
        let app = complete_builder().build();
        assert!(app.is_ok());
    }

    #[test]
    fn test_build_missing_ports() {
        let app = AppBuilder::new()
            .cache(Arc::new(InMemoryCache::new()))
            .build();
        assert!(matches!(
            app,
            Err(BuildError::MissingPorts(missing)) if missing == vec!["search", "notifier"]
        ));
    }

    #[test]
    fn test_build_nothing_provided() {
        let err = AppBuilder::new().build().err().unwrap();
        assert_eq!(
            err.to_string(),
            r#"Missing ports: ["cache", "search", "notifier"]. These ports must be provided before build()."#
        );
    }

    #[test]
    fn test_build_keeps_config() {
        let app = complete_builder()
            .config(RepositoryConfig::default().with_cache_ttl(Duration::from_secs(5)))
            .build()
            .unwrap();
        assert_eq!(app.config().cache_ttl(), Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_services_share_ports() {
        let notifier = Arc::new(InMemoryNotifier::new());
        let app = AppBuilder::new()
            .cache(Arc::new(InMemoryCache::new()))
            .search(Arc::new(InMemorySearchIndex::new()))
            .notifier(notifier.clone())
            .build()
            .unwrap();
        let store: Arc<InMemoryStore<Post>> = Arc::new(InMemoryStore::new());

        let writer = app.service::<Post>(store.clone());
        let reader = app.service::<Post>(store);

        let post = writer.create(PostFields::new("A", "B")).await.unwrap();
        assert_eq!(reader.get(&post.id.to_string()).await.unwrap(), post);
        assert_eq!(notifier.published_on("post.added").len(), 1);
    }
}

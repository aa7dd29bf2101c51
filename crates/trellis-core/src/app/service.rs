//! EntityService - 外部入力（文字列 ID・クエリ）を repository の型に変換する
//!
//! 整合性のロジックは持ちません。ここでやるのは：
//! - 文字列 ID のパース（失敗したら port に一切触れずに InvalidId）
//! - 検索クエリの正規化（空白だけのクエリは空の結果）

use tracing::debug;

use crate::app::repository::EntityRepository;
use crate::domain::document::SearchHit;
use crate::domain::entity::Entity;
use crate::domain::errors::RepositoryError;
use crate::domain::ids::Id;
use crate::domain::{Post, User};

/// EntityService は transport 層から呼ばれる入口
///
/// # 使用例
/// ```ignore
/// let posts: PostService = app.service(post_store);
/// let post = posts.get("01ARZ3NDEKTSV4RRFFQ69G5FAV").await?;
/// ```
pub struct EntityService<E: Entity> {
    repository: EntityRepository<E>,
}

pub type PostService = EntityService<Post>;
pub type UserService = EntityService<User>;

impl<E: Entity> EntityService<E> {
    pub fn new(repository: EntityRepository<E>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &EntityRepository<E> {
        &self.repository
    }

    pub async fn list(&self) -> Result<Vec<E>, RepositoryError> {
        self.repository.read_all().await
    }

    pub async fn get(&self, id: &str) -> Result<E, RepositoryError> {
        let id = Id::parse(id)?;
        self.repository.read(id).await
    }

    pub async fn create(&self, fields: E::Fields) -> Result<E, RepositoryError> {
        self.repository.create(fields).await
    }

    pub async fn update(&self, id: &str, fields: E::Fields) -> Result<E, RepositoryError> {
        let id = Id::parse(id)?;
        self.repository.update(id, fields).await
    }

    pub async fn patch(&self, id: &str, fields: E::Fields) -> Result<E, RepositoryError> {
        let id = Id::parse(id)?;
        self.repository.patch(id, fields).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        let id = Id::parse(id)?;
        self.repository.delete(id).await
    }

    pub async fn search(&self, query: &str) -> Result<Vec<SearchHit>, RepositoryError> {
        let query = query.trim();
        if query.is_empty() {
            debug!(entity = E::kind(), "blank search query");
            return Ok(Vec::new());
        }
        self.repository.search(query).await
    }
}

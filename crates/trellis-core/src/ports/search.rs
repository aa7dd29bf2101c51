//! SearchIndex port - 文書ストアへの index/delete/query（Elasticsearch または InMemory）

use async_trait::async_trait;

use crate::domain::document::{SearchFields, SearchHit};
use crate::domain::errors::RepositoryError;

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("search backend unavailable: {0}")]
    Unavailable(String),
}

/// Search の失敗は呼び出し側に StoreUnavailable として返す
impl From<SearchError> for RepositoryError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::Unavailable(reason) => {
                RepositoryError::store_unavailable(reason.clone(), SearchError::Unavailable(reason))
            }
        }
    }
}

/// SearchIndex は種別ごとのインデックス（`"posts"`, `"users"`）に文書を保持
///
/// # 設計原則
/// - `index()` は upsert（同じ document_id なら置き換え）
/// - 存在しない文書の `delete()` はエラーではない
/// - `query()` はスコア降順。0 件は正常な結果
#[async_trait]
pub trait SearchIndex: Send + Sync {
    async fn index(
        &self,
        index: &str,
        document_id: &str,
        fields: &SearchFields,
    ) -> Result<(), SearchError>;

    async fn delete(&self, index: &str, document_id: &str) -> Result<(), SearchError>;

    async fn query(&self, index: &str, query: &str) -> Result<Vec<SearchHit>, SearchError>;
}

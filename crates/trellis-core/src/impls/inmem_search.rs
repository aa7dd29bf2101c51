//! InMemorySearchIndex - 開発用の全文検索インデックス
//!
//! # クエリ構文（Elasticsearch の query_string のごく一部）
//! - 空白区切りの語: いずれかのフィールドに出現すればマッチ（OR）
//! - `field:term`: 指定フィールドだけを対象にする
//! - 大文字小文字は区別しない
//!
//! # スコア
//! - 語ごとの出現回数の合計（単純な TF）
//! - スコア 0 の文書は結果に含めない
//! - 同点は document_id の昇順

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::document::{SearchFields, SearchHit};
use crate::ports::{SearchError, SearchIndex};

/// パース済みのクエリ語
#[derive(Debug, Clone, PartialEq, Eq)]
struct QueryTerm {
    field: Option<String>,
    token: String,
}

/// 英数字以外で区切って小文字化
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
}

fn parse_query(query: &str) -> Vec<QueryTerm> {
    let mut terms = Vec::new();
    for raw in query.split_whitespace() {
        let (field, text) = match raw.split_once(':') {
            Some((field, text)) if !field.is_empty() => (Some(field.to_string()), text),
            _ => (None, raw),
        };
        for token in tokenize(text) {
            terms.push(QueryTerm {
                field: field.clone(),
                token,
            });
        }
    }
    terms
}

fn score(fields: &SearchFields, terms: &[QueryTerm]) -> f64 {
    let mut total = 0usize;
    for term in terms {
        for (name, value) in fields {
            if term.field.as_deref().is_some_and(|field| field != name) {
                continue;
            }
            total += tokenize(value).filter(|token| *token == term.token).count();
        }
    }
    total as f64
}

/// InMemorySearchIndex は開発・テスト用の SearchIndex
///
/// # 実装詳細
/// - HashMap<index, BTreeMap<document_id, SearchFields>> で管理
/// - RwLock で読み取り（query）を並行に
pub struct InMemorySearchIndex {
    indices: RwLock<HashMap<String, BTreeMap<String, SearchFields>>>,
    calls: AtomicU64,
    available: AtomicBool,
}

impl InMemorySearchIndex {
    pub fn new() -> Self {
        Self {
            indices: RwLock::new(HashMap::new()),
            calls: AtomicU64::new(0),
            available: AtomicBool::new(true),
        }
    }

    /// false にすると全操作が `SearchError::Unavailable` を返す
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// index/delete/query が呼ばれた回数（失敗した呼び出しも含む）
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    /// テスト用: 保存されている文書をそのまま取得
    pub async fn document(&self, index: &str, document_id: &str) -> Option<SearchFields> {
        let indices = self.indices.read().await;
        indices.get(index)?.get(document_id).cloned()
    }

    pub async fn document_count(&self, index: &str) -> usize {
        let indices = self.indices.read().await;
        indices.get(index).map_or(0, BTreeMap::len)
    }

    fn enter(&self) -> Result<(), SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(SearchError::Unavailable(
                "in-memory search index disabled".to_string(),
            ))
        }
    }
}

impl Default for InMemorySearchIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchIndex for InMemorySearchIndex {
    async fn index(
        &self,
        index: &str,
        document_id: &str,
        fields: &SearchFields,
    ) -> Result<(), SearchError> {
        self.enter()?;
        let mut indices = self.indices.write().await;
        indices
            .entry(index.to_string())
            .or_default()
            .insert(document_id.to_string(), fields.clone());
        Ok(())
    }

    async fn delete(&self, index: &str, document_id: &str) -> Result<(), SearchError> {
        self.enter()?;
        let mut indices = self.indices.write().await;
        if let Some(documents) = indices.get_mut(index) {
            documents.remove(document_id);
        }
        Ok(())
    }

    async fn query(&self, index: &str, query: &str) -> Result<Vec<SearchHit>, SearchError> {
        self.enter()?;
        let terms = parse_query(query);
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let indices = self.indices.read().await;
        let Some(documents) = indices.get(index) else {
            return Ok(Vec::new());
        };

        // BTreeMap の走査順は document_id 昇順なので、stable sort で同点の順序が決まる
        let mut hits: Vec<SearchHit> = documents
            .iter()
            .map(|(id, fields)| SearchHit::new(id.clone(), score(fields, &terms)))
            .filter(|hit| hit.score > 0.0)
            .collect();
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        Ok(hits)
    }
}

//! SearchDocument - 検索インデックス用の平坦化された射影

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// フィールド名 → 値 の平坦なマップ
///
/// BTreeMap なのでフィールド順は決定的です（テストで比較しやすい）。
pub type SearchFields = BTreeMap<String, String>;

/// 検索結果の 1 件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// EntityID の文字列表現
    pub document_id: String,
    pub score: f64,
}

impl SearchHit {
    pub fn new(document_id: impl Into<String>, score: f64) -> Self {
        Self {
            document_id: document_id.into(),
            score,
        }
    }
}

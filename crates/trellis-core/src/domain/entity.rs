//! Entity trait - repository が扱うレコード型の共通インターフェース
//!
//! # 学習ポイント
//! - Associated Types (`Marker`, `Fields`)
//! - Trait bounds の組み合わせ (Serialize + DeserializeOwned + Send + Sync + 'static)
//! - reflection の代わりに明示的な射影関数（`search_fields`）

use std::fmt::Debug;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::document::SearchFields;
use super::ids::{Id, IdMarker};

/// Entity は primary store に保存される 1 レコード
///
/// # 使用例
/// ```ignore
/// impl Entity for Post {
///     type Marker = PostKind;
///     type Fields = PostFields;
///     ...
/// }
/// ```
///
/// # Trait Bounds
/// - `Serialize` / `DeserializeOwned`: キャッシュ値（JSON bytes）との相互変換のため
/// - `Send + Sync + 'static`: Arc で共有された port 越しに受け渡すため
pub trait Entity: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// ID のマーカー型（種別名・コレクション名もここから取る）
    type Marker: IdMarker;

    /// 可変フィールドの集合（ID を含まない）。create/update/patch の入力
    type Fields: Clone + Debug + Send + Sync + 'static;

    /// store が採番した ID
    fn id(&self) -> Id<Self::Marker>;

    /// 採番済み ID とフィールドから Entity を組み立てる
    fn from_fields(id: Id<Self::Marker>, fields: Self::Fields) -> Self;

    /// Update の意味論: 全フィールドを無条件に置き換える（空文字ならクリア）
    fn replace(&mut self, fields: Self::Fields);

    /// Patch の意味論: 空でないフィールドだけを反映する
    fn patch(&mut self, fields: Self::Fields);

    /// 検索インデックス用の平坦な射影
    fn search_fields(&self) -> SearchFields;

    fn kind() -> &'static str {
        <Self::Marker as IdMarker>::KIND
    }

    fn collection() -> &'static str {
        <Self::Marker as IdMarker>::COLLECTION
    }
}

/// Patch 用: 値が空でなければ上書き
pub(crate) fn overwrite_if_present(target: &mut String, value: String) {
    if !value.is_empty() {
        *target = value;
    }
}

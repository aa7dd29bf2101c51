//! Domain identifiers (strongly-typed IDs).
//!
//! # ULID ベースの EntityID + ジェネリック実装
//! EntityID は primary store が採番する不透明な ID です。
//! 実体は ULID ですが、呼び出し側は文字列としてしか扱いません。
//!
//! ## Phantom Type パターン
//! `Id<T>` というジェネリック型で共通実装を提供しつつ、
//! `T` は実行時には使わない（PhantomData）マーカー型として、
//! コンパイル時の型安全性を提供します（PostId と UserId は混同できない）。
//!
//! ## 境界でのパース
//! 外部から来る文字列 ID は `Id::parse()` で一度だけ検証します。
//! repository の内部では ID 型の分岐はありません。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::str::FromStr;
use ulid::Ulid;

/// IdMarker は各エンティティ種別のマーカー trait
///
/// cache key・topic・検索インデックス名の元になる名前を提供します。
///
/// `#[derive]` は型パラメータにも同じ trait を要求するので、
/// `Id<T>` を Copy / Hash / Ord にするためにマーカー側にも要求します。
pub trait IdMarker:
    fmt::Debug + Copy + Eq + Hash + Ord + Send + Sync + 'static
{
    /// 単数形の種別名（例: "post"）。cache key と topic に使う
    const KIND: &'static str;

    /// コレクション名（例: "posts"）。一覧キャッシュのキーとインデックス名に使う
    const COLLECTION: &'static str;
}

/// ジェネリック ID 型
///
/// # 例
/// ```ignore
/// let post_id: PostId = Id::parse("01ARZ3NDEKTSV4RRFFQ69G5FAV")?;
/// let user_id: UserId = Id::from(Ulid::new());
/// // post_id と user_id は異なる型なので、混同できない
/// ```
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id<T: IdMarker> {
    ulid: Ulid,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

/// IdParseError は外部 ID のパース失敗
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} id '{input}': {reason}")]
pub struct IdParseError {
    pub kind: &'static str,
    pub input: String,
    pub reason: String,
}

impl<T: IdMarker> Id<T> {
    /// ULID から Id を作成
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self {
            ulid,
            _marker: PhantomData,
        }
    }

    /// 外部から渡された文字列を Id にパース
    ///
    /// 前後の空白も含めて厳密に検証します（trim しない）。
    pub fn parse(input: &str) -> Result<Self, IdParseError> {
        Ulid::from_string(input)
            .map(Self::from_ulid)
            .map_err(|e| IdParseError {
                kind: T::KIND,
                input: input.to_string(),
                reason: e.to_string(),
            })
    }

    /// 内部の ULID を取得
    pub fn as_ulid(&self) -> Ulid {
        self.ulid
    }

    /// 単一エンティティのキャッシュキー（`"<kind>:<id>"`）
    pub fn cache_key(&self) -> String {
        format!("{}:{}", T::KIND, self.ulid)
    }
}

impl<T: IdMarker> From<Ulid> for Id<T> {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl<T: IdMarker> FromStr for Id<T> {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// canonical string form（ULID 文字列そのもの）
impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ulid)
    }
}

// ========================================
// マーカー型の定義
// ========================================

/// Post のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PostKind {}

impl IdMarker for PostKind {
    const KIND: &'static str = "post";
    const COLLECTION: &'static str = "posts";
}

/// User のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UserKind {}

impl IdMarker for UserKind {
    const KIND: &'static str = "user";
    const COLLECTION: &'static str = "users";
}

// ========================================
// Type Alias（使いやすさのため）
// ========================================

/// Identifier of a Post.
pub type PostId = Id<PostKind>;

/// Identifier of a User.
pub type UserId = Id<UserKind>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn ids_are_distinct_types() {
        let ulid1 = Ulid::new();
        let ulid2 = Ulid::new();

        let post = PostId::from_ulid(ulid1);
        let user = UserId::from_ulid(ulid2);

        assert_eq!(post.as_ulid(), ulid1);
        assert_eq!(user.as_ulid(), ulid2);

        // The whole point: you can't accidentally mix these types.
        // let _: PostId = user; // <- does not compile
    }

    #[test]
    fn display_is_canonical_ulid_string() {
        let ulid = Ulid::new();
        let post = PostId::from_ulid(ulid);
        assert_eq!(post.to_string(), ulid.to_string());
        assert_eq!(post.to_string().len(), 26);
    }

    #[test]
    fn cache_key_is_prefixed_by_kind() {
        let ulid = Ulid::new();
        assert_eq!(PostId::from_ulid(ulid).cache_key(), format!("post:{ulid}"));
        assert_eq!(UserId::from_ulid(ulid).cache_key(), format!("user:{ulid}"));
    }

    #[test]
    fn parse_accepts_canonical_form() {
        let original = PostId::from_ulid(Ulid::new());
        let parsed = PostId::parse(&original.to_string()).unwrap();
        assert_eq!(parsed, original);

        let via_from_str: PostId = original.to_string().parse().unwrap();
        assert_eq!(via_from_str, original);
    }

    #[rstest]
    #[case::empty("")]
    #[case::too_short("01ARZ3NDEKTSV4RRFFQ69G5FA")]
    #[case::too_long("01ARZ3NDEKTSV4RRFFQ69G5FAVX")]
    #[case::invalid_char("01ARZ3NDEKTSV4RRFFQ69G5FA!")]
    #[case::padded(" 01ARZ3NDEKTSV4RRFFQ69G5FAV")]
    #[case::mongo_object_id("64b7f0c2e13b2a5d9c8e4f11")]
    fn parse_rejects_malformed_input(#[case] input: &str) {
        let err = PostId::parse(input).unwrap_err();
        assert_eq!(err.kind, "post");
        assert_eq!(err.input, input);
    }

    #[test]
    fn ulid_ids_are_sortable() {
        let id1 = PostId::from_ulid(Ulid::new());
        std::thread::sleep(std::time::Duration::from_millis(2));
        let id2 = PostId::from_ulid(Ulid::new());

        assert!(id1 < id2);
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let post_id = PostId::from_ulid(Ulid::new());

        let serialized = serde_json::to_string(&post_id).unwrap();
        assert_eq!(serialized, format!("\"{post_id}\""));

        let deserialized: PostId = serde_json::from_str(&serialized).unwrap();
        assert_eq!(post_id, deserialized);
    }

    #[test]
    fn ids_are_copy_and_hashable_in_generic_code() {
        use std::collections::HashSet;

        fn dedup<T: IdMarker>(ids: &[Id<T>]) -> usize {
            let first = ids[0];
            let set: HashSet<Id<T>> = ids.iter().copied().collect();
            assert_eq!(first, ids[0]);
            set.len()
        }

        let id = PostId::from_ulid(Ulid::new());
        assert_eq!(dedup(&[id, id, PostId::from_ulid(Ulid::new())]), 2);
    }

    #[test]
    fn phantom_data_does_not_consume_memory() {
        use std::mem::size_of;

        assert_eq!(size_of::<PostId>(), size_of::<Ulid>());
        assert_eq!(size_of::<UserId>(), size_of::<Ulid>());
    }
}

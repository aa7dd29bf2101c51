//! Events - エンティティ変更の通知
//!
//! Event は永続化されません（at-most-once、失敗しても元の操作は成功扱い）。

use serde::{Deserialize, Serialize};

use super::ids::{Id, IdMarker};

/// ChangeKind は変更の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Updated,
    Deleted,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Added => "added",
            ChangeKind::Updated => "updated",
            ChangeKind::Deleted => "deleted",
        }
    }
}

/// Event は topic と payload の組
///
/// # Topic 命名規約
/// - `{kind}.{change}`
/// - 例: `post.added`, `user.deleted`
///
/// payload は EntityID の canonical string を UTF-8 bytes にしたもの。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub topic: String,
    pub payload: Vec<u8>,
}

impl Event {
    pub fn new(topic: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
        }
    }

    /// エンティティ変更イベントを作成
    pub fn entity<T: IdMarker>(change: ChangeKind, id: Id<T>) -> Self {
        Self::new(Self::topic_for::<T>(change), id.to_string())
    }

    pub fn topic_for<T: IdMarker>(change: ChangeKind) -> String {
        format!("{}.{}", T::KIND, change.as_str())
    }

    /// payload を文字列として読む（UTF-8 でなければ None）
    pub fn payload_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.payload).ok()
    }
}

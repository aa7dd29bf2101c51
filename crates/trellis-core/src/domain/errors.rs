//! Errors - エラー型と分類
//!
//! repository が呼び出し側に返すのは primary store 由来のエラーだけです。
//! cache / search / notifier の失敗はログに残して捨てます（ここには現れない）。

use std::error::Error as StdError;

use super::ids::IdParseError;

/// port 由来のエラーをそのまま保持するための型
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// ErrorKind はエラーの運用分類
///
/// - Permanent: 恒久的なエラー（リトライ無意味）
/// - Infrastructure: インフラエラー（primary store / search backend の障害）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Permanent,
    Infrastructure,
}

/// RepositoryError は repository / service の操作エラー
///
/// transport 層はこれをステータスコードに変換します（このクレートの範囲外）。
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// 外部 ID が store のネイティブ ID 形式にパースできない
    #[error(transparent)]
    InvalidId(#[from] IdParseError),

    #[error("{kind} not found: id={id}")]
    NotFound { kind: &'static str, id: String },

    /// primary store（Search では search backend）の障害
    ///
    /// `source` に元の `StoreError` / `SearchError` が入ります。
    #[error("store unavailable: {reason}")]
    StoreUnavailable {
        reason: String,
        #[source]
        source: BoxError,
    },
}

impl RepositoryError {
    pub fn store_unavailable(reason: impl Into<String>, source: impl Into<BoxError>) -> Self {
        RepositoryError::StoreUnavailable {
            reason: reason.into(),
            source: source.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            RepositoryError::InvalidId(_) | RepositoryError::NotFound { .. } => {
                ErrorKind::Permanent
            }
            RepositoryError::StoreUnavailable { .. } => ErrorKind::Infrastructure,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::PostId;
    use std::io;

    #[test]
    fn invalid_id_is_permanent() {
        let err: RepositoryError = PostId::parse("nope").unwrap_err().into();
        assert_eq!(err.kind(), ErrorKind::Permanent);
        assert!(err.to_string().starts_with("invalid post id 'nope'"));
    }

    #[test]
    fn store_unavailable_is_infrastructure_and_keeps_its_cause() {
        let cause = io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused");
        let err = RepositoryError::store_unavailable("connection refused", cause);

        assert_eq!(err.kind(), ErrorKind::Infrastructure);
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "store unavailable: connection refused");

        let source = err.source().unwrap();
        let io_err = source.downcast_ref::<io::Error>().unwrap();
        assert_eq!(io_err.kind(), io::ErrorKind::ConnectionRefused);
    }
}

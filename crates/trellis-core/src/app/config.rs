//! RepositoryConfig - repository の設定値

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// キャッシュ TTL の既定値（1 時間）
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

/// TTL の下限。0 秒だと書いた瞬間に期限切れになりキャッシュが無効になる
pub const MIN_CACHE_TTL_SECS: u64 = 1;

/// RepositoryConfig は全 repository で共有する設定
///
/// TTL は秒で表現します（設定ファイル・環境変数と揃えるため）。
/// `MIN_CACHE_TTL_SECS` 未満の値は下限に切り上げます。
///
/// # 使用例
/// ```ignore
/// let config = RepositoryConfig::default().with_cache_ttl(Duration::from_secs(60));
/// let config: RepositoryConfig = serde_json::from_str(r#"{"cache_ttl_secs": 60}"#)?;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    pub cache_ttl_secs: u64,
}

impl RepositoryConfig {
    /// 設定ファイル由来の 0 もここで下限に揃う
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs.max(MIN_CACHE_TTL_SECS))
    }

    /// 秒未満は切り捨て、下限未満は下限に切り上げ
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        let requested = ttl.as_secs();
        if requested < MIN_CACHE_TTL_SECS {
            warn!(
                requested_ms = ttl.as_millis() as u64,
                clamped_secs = MIN_CACHE_TTL_SECS,
                "cache ttl below minimum, clamped"
            );
        }
        self.cache_ttl_secs = requested.max(MIN_CACHE_TTL_SECS);
        self
    }
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn default_ttl_is_one_hour() {
        assert_eq!(RepositoryConfig::default().cache_ttl(), Duration::from_secs(3600));
    }

    #[test]
    fn with_cache_ttl_truncates_to_seconds() {
        let config = RepositoryConfig::default().with_cache_ttl(Duration::from_millis(90_500));
        assert_eq!(config.cache_ttl_secs, 90);
    }

    #[rstest]
    #[case::zero(Duration::ZERO)]
    #[case::sub_second(Duration::from_millis(500))]
    fn ttl_below_one_second_is_clamped(#[case] ttl: Duration) {
        let config = RepositoryConfig::default().with_cache_ttl(ttl);
        assert_eq!(config.cache_ttl_secs, MIN_CACHE_TTL_SECS);
        assert_eq!(config.cache_ttl(), Duration::from_secs(1));
    }

    #[test]
    fn zero_from_config_file_still_yields_minimum_ttl() {
        let config: RepositoryConfig = serde_json::from_str(r#"{"cache_ttl_secs": 0}"#).unwrap();
        assert_eq!(config.cache_ttl(), Duration::from_secs(MIN_CACHE_TTL_SECS));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: RepositoryConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, RepositoryConfig::default());

        let config: RepositoryConfig = serde_json::from_str(r#"{"cache_ttl_secs": 5}"#).unwrap();
        assert_eq!(config.cache_ttl(), Duration::from_secs(5));
    }
}

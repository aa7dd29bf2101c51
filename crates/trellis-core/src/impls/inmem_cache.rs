//! InMemoryCache - 開発用の TTL 付きキャッシュ
//!
//! # 学習ポイント
//! - Clock の注入による TTL の決定的なテスト
//! - 期限切れエントリの lazy eviction（アクセス時に削除）
//! - AtomicBool による障害注入（Redis ダウンの再現）

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::Mutex;

use crate::ports::{CacheError, CacheStore, Clock, SystemClock};

struct Entry {
    value: Vec<u8>,
    expires_at: DateTime<Utc>,
}

/// キャッシュ操作の統計
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    pub deletes: u64,
    /// TTL 切れで捨てたエントリ数
    pub expired: u64,
}

impl CacheStats {
    /// get/set/delete の合計（「cache に触ったか」の判定に使う）
    pub fn operations(&self) -> u64 {
        self.hits + self.misses + self.sets + self.deletes
    }
}

#[derive(Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    sets: AtomicU64,
    deletes: AtomicU64,
    expired: AtomicU64,
}

/// InMemoryCache は開発・テスト用の CacheStore
///
/// # 使用例
/// ```ignore
/// let clock = Arc::new(FixedClock::new(start));
/// let cache = InMemoryCache::with_clock(clock.clone());
/// cache.set("post:01H...", bytes, Duration::from_secs(3600)).await?;
/// clock.advance(TimeDelta::hours(2));
/// assert!(cache.get("post:01H...").await?.is_none());
/// ```
pub struct InMemoryCache<C = SystemClock> {
    entries: Mutex<HashMap<String, Entry>>,
    clock: C,
    counters: Counters,
    available: AtomicBool,
}

impl InMemoryCache<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for InMemoryCache<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> InMemoryCache<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
            counters: Counters::default(),
            available: AtomicBool::new(true),
        }
    }

    /// false にすると全操作が `CacheError::Unavailable` を返す
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::SeqCst),
            misses: self.counters.misses.load(Ordering::SeqCst),
            sets: self.counters.sets.load(Ordering::SeqCst),
            deletes: self.counters.deletes.load(Ordering::SeqCst),
            expired: self.counters.expired.load(Ordering::SeqCst),
        }
    }

    /// 統計に影響せずにキーの有無を確認（期限切れは無いものとする）
    pub async fn contains_key(&self, key: &str) -> bool {
        let now = self.clock.now();
        let entries = self.entries.lock().await;
        entries.get(key).is_some_and(|entry| entry.expires_at > now)
    }

    fn check_available(&self) -> Result<(), CacheError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(CacheError::Unavailable("in-memory cache disabled".to_string()))
        }
    }

    fn expiry(&self, ttl: Duration) -> DateTime<Utc> {
        let now = self.clock.now();
        TimeDelta::from_std(ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

#[async_trait]
impl<C: Clock> CacheStore for InMemoryCache<C> {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        self.check_available()?;
        let now = self.clock.now();
        let mut entries = self.entries.lock().await;

        let expired = match entries.get(key) {
            Some(entry) if entry.expires_at > now => {
                self.counters.hits.fetch_add(1, Ordering::SeqCst);
                return Ok(Some(entry.value.clone()));
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.remove(key);
            self.counters.expired.fetch_add(1, Ordering::SeqCst);
        }
        self.counters.misses.fetch_add(1, Ordering::SeqCst);
        Ok(None)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError> {
        self.check_available()?;
        let expires_at = self.expiry(ttl);
        let mut entries = self.entries.lock().await;
        entries.insert(key.to_string(), Entry { value, expires_at });
        self.counters.sets.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.check_available()?;
        let mut entries = self.entries.lock().await;
        entries.remove(key);
        self.counters.deletes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

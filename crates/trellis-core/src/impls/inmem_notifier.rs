//! InMemoryNotifier - 開発用の publish/subscribe
//!
//! # 学習ポイント
//! - std::sync::Mutex を await を跨がずに使う
//! - ハンドラはロックを外してから呼ぶ（ハンドラ内で publish してもデッドロックしない）
//! - ハンドラの panic は catch_unwind で閉じ込める（publish 側には伝播させない）
//! - topic による複数チャンネルの管理

use std::any::Any;
use std::collections::{HashMap, VecDeque};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use tracing::warn;

use crate::domain::events::Event;
use crate::ports::{MessageHandler, Notifier, NotifyError};

/// 配信ログに残す件数の既定値（古いものから捨てる）
pub const DEFAULT_LOG_CAPACITY: usize = 1024;

/// InMemoryNotifier は開発・テスト用の Notifier
///
/// # 実装詳細
/// - HashMap<String, Vec<MessageHandler>> で topic ごとにハンドラを管理
/// - publish は登録順にハンドラを同期的に呼ぶ
/// - panic したハンドラは warn を出して読み飛ばす（publish は成功扱い）
/// - 配信したメッセージは直近 `log_capacity` 件だけ `published()` で確認できる
///
/// # 使用例
/// ```ignore
/// let notifier = InMemoryNotifier::new();
/// notifier.subscribe("post.added", Arc::new(|id| println!("{id:?}"))).await?;
/// notifier.publish("post.added", b"01H...").await?;
/// ```
pub struct InMemoryNotifier {
    handlers: Mutex<HashMap<String, Vec<MessageHandler>>>,
    published: Mutex<VecDeque<Event>>,
    log_capacity: usize,
    closed: AtomicBool,
    available: AtomicBool,
}

impl InMemoryNotifier {
    pub fn new() -> Self {
        Self::with_log_capacity(DEFAULT_LOG_CAPACITY)
    }

    /// 配信ログの上限を指定して作成（0 なら記録しない）
    pub fn with_log_capacity(log_capacity: usize) -> Self {
        Self {
            handlers: Mutex::new(HashMap::new()),
            published: Mutex::new(VecDeque::new()),
            log_capacity,
            closed: AtomicBool::new(false),
            available: AtomicBool::new(true),
        }
    }

    /// false にすると publish/subscribe が `NotifyError::Unavailable` を返す
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// 配信に成功したメッセージ（古い順、直近 `log_capacity` 件）
    pub fn published(&self) -> Vec<Event> {
        self.published
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    pub fn published_on(&self, topic: &str) -> Vec<Event> {
        self.published()
            .into_iter()
            .filter(|event| event.topic == topic)
            .collect()
    }

    fn check_open(&self) -> Result<(), NotifyError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(NotifyError::Closed);
        }
        if !self.available.load(Ordering::SeqCst) {
            return Err(NotifyError::Unavailable(
                "in-memory notifier disabled".to_string(),
            ));
        }
        Ok(())
    }

    fn record(&self, event: Event) {
        if self.log_capacity == 0 {
            return;
        }
        let mut published = self.published.lock().unwrap_or_else(PoisonError::into_inner);
        while published.len() >= self.log_capacity {
            published.pop_front();
        }
        published.push_back(event);
    }
}

impl Default for InMemoryNotifier {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

#[async_trait]
impl Notifier for InMemoryNotifier {
    async fn publish(&self, topic: &str, payload: &[u8]) -> Result<(), NotifyError> {
        self.check_open()?;

        let handlers = {
            let handlers = self.handlers.lock().unwrap_or_else(PoisonError::into_inner);
            handlers.get(topic).cloned().unwrap_or_default()
        };
        self.record(Event::new(topic, payload));

        for (index, handler) in handlers.iter().enumerate() {
            if let Err(panic) = catch_unwind(AssertUnwindSafe(|| handler(payload))) {
                warn!(
                    topic,
                    handler = index,
                    reason = panic_message(panic.as_ref()),
                    "subscriber panicked"
                );
            }
        }
        Ok(())
    }

    async fn subscribe(&self, topic: &str, handler: MessageHandler) -> Result<(), NotifyError> {
        self.check_open()?;
        let mut handlers = self.handlers.lock().unwrap_or_else(PoisonError::into_inner);
        handlers.entry(topic.to_string()).or_default().push(handler);
        Ok(())
    }

    async fn close(&self) -> Result<(), NotifyError> {
        self.closed.store(true, Ordering::SeqCst);
        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        Ok(())
    }
}

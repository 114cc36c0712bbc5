//! QueryClient - 共有クエリキャッシュ
//!
//! # 学習ポイント
//! - `Box<dyn Any + Send + Sync>` による型消去と downcast での取り出し
//! - read-modify-write を 1 つの write lock の中で行う（途中の状態を他から見せない）
//! - clone 可能なハンドル（`Arc` 共有）として注入する

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::debug;

use super::{QueryKey, RetryPolicy};

/// QueryClientConfig はキャッシュ全体の既定動作
///
/// `Default` はライブラリ一般の既定値（3 回リトライ、フォーカス時に再取得）。
/// アプリケーションの bootstrap では両方とも無効にする。
#[derive(Debug, Clone, PartialEq)]
pub struct QueryClientConfig {
    /// 失敗したクエリの再試行
    pub retry: RetryPolicy,

    /// ウィンドウにフォーカスが戻ったときに再取得するか
    pub refetch_on_window_focus: bool,

    /// この時間を過ぎたスナップショットは stale
    pub stale_time: Duration,
}

impl Default for QueryClientConfig {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::with_retries(3),
            refetch_on_window_focus: true,
            stale_time: Duration::ZERO,
        }
    }
}

impl QueryClientConfig {
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_refetch_on_window_focus(mut self, enabled: bool) -> Self {
        self.refetch_on_window_focus = enabled;
        self
    }

    pub fn with_stale_time(mut self, stale_time: Duration) -> Self {
        self.stale_time = stale_time;
        self
    }
}

struct CacheEntry {
    data: Box<dyn Any + Send + Sync>,
    updated_at: DateTime<Utc>,
}

/// QueryClient は key ごとのスナップショットを保持する
///
/// # 使用例
/// ```ignore
/// let client = QueryClient::new(QueryClientConfig::default());
/// client.set_query_data(QueryKey::tasks(), vec![task]);
/// let tasks: Option<Vec<Task>> = client.get_query_data(&QueryKey::tasks());
/// ```
#[derive(Clone)]
pub struct QueryClient {
    config: Arc<QueryClientConfig>,
    entries: Arc<RwLock<HashMap<QueryKey, CacheEntry>>>,
}

impl QueryClient {
    pub fn new(config: QueryClientConfig) -> Self {
        Self {
            config: Arc::new(config),
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn config(&self) -> &QueryClientConfig {
        &self.config
    }

    /// スナップショットを clone して返す
    ///
    /// key がない、または別の型で保存されている場合は `None`。
    pub fn get_query_data<T>(&self, key: &QueryKey) -> Option<T>
    where
        T: Clone + 'static,
    {
        let entries = self.entries.read();
        entries
            .get(key)
            .and_then(|entry| entry.data.downcast_ref::<T>())
            .cloned()
    }

    pub fn set_query_data<T>(&self, key: QueryKey, data: T)
    where
        T: Send + Sync + 'static,
    {
        debug!(key = %key, "set query data");
        self.entries.write().insert(
            key,
            CacheEntry {
                data: Box::new(data),
                updated_at: Utc::now(),
            },
        );
    }

    /// 既存のスナップショットに `f` を適用して置き換える
    ///
    /// スナップショットがなければ何もせず `false` を返す（エラーではない）。
    /// 読み出しから書き戻しまで同じ write lock の中で行うので、
    /// 同時に走った更新は直列化され、最後に完了したものが残る。
    pub fn update_query_data<T, F>(&self, key: &QueryKey, f: F) -> bool
    where
        T: Send + Sync + 'static,
        F: FnOnce(&T) -> T,
    {
        let mut entries = self.entries.write();
        let Some(entry) = entries.get_mut(key) else {
            debug!(key = %key, "no snapshot to patch");
            return false;
        };
        let Some(current) = entry.data.downcast_ref::<T>() else {
            debug!(key = %key, "snapshot has a different type, skip patch");
            return false;
        };
        let next = f(current);
        entry.data = Box::new(next);
        entry.updated_at = Utc::now();
        true
    }

    pub fn remove_queries(&self, key: &QueryKey) -> bool {
        self.entries.write().remove(key).is_some()
    }

    pub fn data_updated_at(&self, key: &QueryKey) -> Option<DateTime<Utc>> {
        self.entries.read().get(key).map(|entry| entry.updated_at)
    }

    /// `now` 時点で stale か（スナップショットがなければ stale）
    pub fn is_stale(&self, key: &QueryKey, now: DateTime<Utc>) -> bool {
        let Some(updated_at) = self.data_updated_at(key) else {
            return true;
        };
        let age = now.signed_duration_since(updated_at);
        match age.to_std() {
            Ok(age) => age >= self.config.stale_time,
            // updated_at が未来（時計の巻き戻り）なら fresh 扱い
            Err(_) => false,
        }
    }
}

impl std::fmt::Debug for QueryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keys: Vec<QueryKey> = self.entries.read().keys().cloned().collect();
        f.debug_struct("QueryClient")
            .field("config", &self.config)
            .field("keys", &keys)
            .finish()
    }
}

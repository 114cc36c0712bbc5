//! QueryTasks - タスク一覧の取得
//!
//! 一覧を GET して `["tasks"]` に保存する。mutation はこのスナップショットに patch を当てる。

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::domain::{ApiError, ErrorKind, Task};
use crate::ports::{Navigator, ROOT_ROUTE, TaskApi};
use crate::query::{QueryClient, QueryKey};

#[derive(Clone)]
pub struct QueryTasks {
    api: Arc<dyn TaskApi>,
    query_client: QueryClient,
    navigator: Arc<dyn Navigator>,
}

impl QueryTasks {
    pub fn new(api: Arc<dyn TaskApi>, query_client: QueryClient, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            api,
            query_client,
            navigator,
        }
    }

    /// キャッシュ上の一覧（まだ取得していなければ `None`）
    pub fn cached(&self) -> Option<Vec<Task>> {
        self.query_client.get_query_data(&QueryKey::tasks())
    }

    /// 一覧を取得してキャッシュに保存
    ///
    /// 失敗時は QueryClient の RetryPolicy に従って再試行する。
    /// 401 / 403 は再試行せず入口 `/` へ遷移する。
    pub async fn fetch(&self) -> Result<Vec<Task>, ApiError> {
        let retry = self.query_client.config().retry.clone();
        let mut attempts = 0;
        loop {
            attempts += 1;
            match self.api.list_tasks().await {
                Ok(tasks) => {
                    debug!(count = tasks.len(), attempts, "tasks fetched");
                    self.query_client
                        .set_query_data(QueryKey::tasks(), tasks.clone());
                    return Ok(tasks);
                }
                Err(e) if e.kind() == ErrorKind::Unauthorized => {
                    warn!(error = %e, "not authorized, redirecting to {ROOT_ROUTE}");
                    self.navigator.push(ROOT_ROUTE);
                    return Err(e);
                }
                Err(e) if retry.should_retry(attempts) => {
                    let delay = retry.next_delay(attempts);
                    debug!(error = %e, attempts, ?delay, "fetch failed, retrying");
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// ウィンドウにフォーカスが戻ったとき
    ///
    /// `refetch_on_window_focus` が有効で、かつスナップショットが stale のときだけ再取得する。
    /// 再取得したら `true`。
    pub async fn on_window_focus(&self) -> Result<bool, ApiError> {
        if !self.query_client.config().refetch_on_window_focus {
            return Ok(false);
        }
        if !self.query_client.is_stale(&QueryKey::tasks(), Utc::now()) {
            return Ok(false);
        }
        self.fetch().await.map(|_| true)
    }
}

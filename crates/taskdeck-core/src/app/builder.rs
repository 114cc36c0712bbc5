//! AppBuilder - 起動時のワイヤリング（session bootstrap）
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）
//! - 共有状態（QueryClient, DraftStore, ApiClient）を 1 か所で作り、各機能に注入する
//!
//! # CSRF トークンの取得
//! `App::start()` が一度だけ `/auth/csrf` を呼び、取得したトークンを共通ヘッダーに載せる。
//! - `CsrfMode::Background`（既定）: spawn して即座に戻る。取得完了前に出たリクエストには
//!   トークンが載らない（その競合はそのまま残している）
//! - `CsrfMode::AwaitBeforeReady`: 取得が終わるまで `start()` が戻らない

use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::mutate_task::MutateTask;
use super::query_tasks::QueryTasks;
use super::theme::Theme;
use crate::config::Config;
use crate::domain::DraftStore;
use crate::impls::{ApiClient, ApiClientConfig, HttpTaskApi};
use crate::ports::{Navigator, TaskApi};
use crate::query::{QueryClient, QueryClientConfig, RetryPolicy};

/// CSRF トークン取得の待ち方
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CsrfMode {
    #[default]
    Background,
    AwaitBeforeReady,
}

impl FromStr for CsrfMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "background" => Ok(CsrfMode::Background),
            "await" | "await_before_ready" => Ok(CsrfMode::AwaitBeforeReady),
            other => Err(format!("unknown csrf mode: {other}")),
        }
    }
}

/// BuildError はアプリケーション構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Missing collaborators: {0:?}. These must be set before build().")]
    MissingCollaborators(Vec<&'static str>),

    #[error("failed to create HTTP client: {0}")]
    HttpClient(String),
}

/// bootstrap が使うキャッシュ設定: 失敗しても再試行しない、フォーカスで再取得しない
pub fn bootstrap_query_config() -> QueryClientConfig {
    QueryClientConfig::default()
        .with_retry(RetryPolicy::disabled())
        .with_refetch_on_window_focus(false)
}

/// AppBuilder はアプリケーションを構築
///
/// # 使用例
/// ```ignore
/// let app = AppBuilder::from_config(&config)?
///     .navigator(LogNavigator)
///     .build()?;
/// app.start().await;
/// ```
pub struct AppBuilder {
    api: Option<Arc<dyn TaskApi>>,
    navigator: Option<Arc<dyn Navigator>>,
    query_config: QueryClientConfig,
    theme: Theme,
    csrf_mode: CsrfMode,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            api: None,
            navigator: None,
            query_config: bootstrap_query_config(),
            theme: Theme::dark(),
            csrf_mode: CsrfMode::default(),
        }
    }

    /// 設定から HTTP バックエンドを組み立てる
    ///
    /// クライアントは cookie（credentials）付きで作る。
    pub fn from_config(config: &Config) -> Result<Self, BuildError> {
        let client_config =
            ApiClientConfig::new(config.api_url.clone()).with_timeout(config.request_timeout());
        let client =
            ApiClient::new(&client_config).map_err(|e| BuildError::HttpClient(e.to_string()))?;
        info!(base_url = %client.base_url(), "http backend configured");
        Ok(Self::new()
            .api(HttpTaskApi::new(client))
            .csrf_mode(config.csrf_mode))
    }

    pub fn api<A: TaskApi + 'static>(mut self, api: A) -> Self {
        self.api = Some(Arc::new(api));
        self
    }

    pub fn navigator<N: Navigator + 'static>(mut self, navigator: N) -> Self {
        self.navigator = Some(Arc::new(navigator));
        self
    }

    pub fn query_config(mut self, config: QueryClientConfig) -> Self {
        self.query_config = config;
        self
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn csrf_mode(mut self, mode: CsrfMode) -> Self {
        self.csrf_mode = mode;
        self
    }

    /// App を生成
    ///
    /// # 検証
    /// - TaskApi と Navigator が設定されているか
    pub fn build(self) -> Result<App, BuildError> {
        let mut missing = Vec::new();
        if self.api.is_none() {
            missing.push("api");
        }
        if self.navigator.is_none() {
            missing.push("navigator");
        }
        let (Some(api), Some(navigator)) = (self.api, self.navigator) else {
            return Err(BuildError::MissingCollaborators(missing));
        };

        Ok(App {
            api,
            navigator,
            query_client: QueryClient::new(self.query_config),
            drafts: DraftStore::new(),
            theme: self.theme,
            csrf_mode: self.csrf_mode,
            started: Arc::new(AtomicBool::new(false)),
        })
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// App はプロセス全体で共有する状態を束ねる
///
/// clone は同じ状態を指す。
#[derive(Clone)]
pub struct App {
    api: Arc<dyn TaskApi>,
    navigator: Arc<dyn Navigator>,
    query_client: QueryClient,
    drafts: DraftStore,
    theme: Theme,
    csrf_mode: CsrfMode,
    started: Arc<AtomicBool>,
}

impl App {
    /// CSRF トークンの取得を始める（アプリケーションのロード時に一度だけ）
    ///
    /// `Background` では spawn したタスクの handle を返す（待たなくてよい）。
    /// `AwaitBeforeReady` と 2 回目以降の呼び出しでは `None`。
    pub async fn start(&self) -> Option<JoinHandle<()>> {
        if self.started.swap(true, Ordering::SeqCst) {
            debug!("app already started");
            return None;
        }
        info!(mode = ?self.csrf_mode, "starting session");

        match self.csrf_mode {
            CsrfMode::Background => {
                let api = self.api.clone();
                Some(tokio::spawn(async move { acquire_csrf_token(api.as_ref()).await }))
            }
            CsrfMode::AwaitBeforeReady => {
                acquire_csrf_token(self.api.as_ref()).await;
                None
            }
        }
    }

    pub fn mutate_task(&self) -> MutateTask {
        MutateTask::new(
            self.api.clone(),
            self.query_client.clone(),
            self.drafts.clone(),
            self.navigator.clone(),
        )
    }

    pub fn query_tasks(&self) -> QueryTasks {
        QueryTasks::new(
            self.api.clone(),
            self.query_client.clone(),
            self.navigator.clone(),
        )
    }

    pub fn query_client(&self) -> &QueryClient {
        &self.query_client
    }

    pub fn drafts(&self) -> &DraftStore {
        &self.drafts
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn csrf_mode(&self) -> CsrfMode {
        self.csrf_mode
    }
}

/// 失敗してもエラーは返さない（ログのみ）。ヘッダーは未設定のまま。
async fn acquire_csrf_token(api: &dyn TaskApi) {
    match api.refresh_csrf_token().await {
        Ok(_) => info!("csrf token acquired"),
        Err(e) => warn!(error = %e, "failed to fetch csrf token, state-changing requests may be rejected"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::theme::ColorScheme;
    use crate::domain::{NewTask, Task, TaskId};
    use crate::impls::{ApiCall, InMemoryTaskApi, RecordingNavigator};
    use crate::query::QueryKey;
    use std::time::Duration;

    fn app(api: &InMemoryTaskApi, mode: CsrfMode) -> App {
        AppBuilder::new()
            .api(api.clone())
            .navigator(RecordingNavigator::new())
            .csrf_mode(mode)
            .build()
            .unwrap()
    }

    #[test]
    fn build_missing_collaborators() {
        let result = AppBuilder::new().build();
        assert!(matches!(
            result,
            Err(BuildError::MissingCollaborators(missing)) if missing == vec!["api", "navigator"]
        ));

        let result = AppBuilder::new().api(InMemoryTaskApi::new()).build();
        assert!(matches!(
            result,
            Err(BuildError::MissingCollaborators(missing)) if missing == vec!["navigator"]
        ));
    }

    #[test]
    fn bootstrap_defaults() {
        let app = app(&InMemoryTaskApi::new(), CsrfMode::Background);

        let config = app.query_client().config();
        assert!(config.retry.is_disabled());
        assert!(!config.refetch_on_window_focus);

        assert_eq!(app.theme().color_scheme, ColorScheme::Dark);
        assert_eq!(app.theme().font_family, "Verdata, sans-serif");
        assert!(!app.drafts().has_draft());
    }

    #[test]
    fn csrf_mode_from_str() {
        assert_eq!("background".parse::<CsrfMode>(), Ok(CsrfMode::Background));
        assert_eq!("AWAIT".parse::<CsrfMode>(), Ok(CsrfMode::AwaitBeforeReady));
        assert!("later".parse::<CsrfMode>().is_err());
    }

    #[tokio::test]
    async fn await_mode_attaches_token_before_returning() {
        let api = InMemoryTaskApi::new()
            .require_csrf(true)
            .with_csrf_delay(Duration::from_millis(20));
        let app = app(&api, CsrfMode::AwaitBeforeReady);

        assert!(app.start().await.is_none());
        assert_eq!(api.csrf_token().as_deref(), Some("csrf-1"));

        app.mutate_task()
            .create_task(NewTask::new("a"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn background_mode_does_not_block() {
        let api = InMemoryTaskApi::new()
            .require_csrf(true)
            .with_csrf_delay(Duration::from_millis(200));
        let app = app(&api, CsrfMode::Background);

        let handle = app.start().await.expect("background fetch is spawned");

        // 取得完了前のリクエストはトークンなしで 403 になる
        let early = app.mutate_task().create_task(NewTask::new("early")).await;
        assert_eq!(early.unwrap_err().status(), Some(403));

        handle.await.unwrap();
        assert_eq!(api.csrf_token().as_deref(), Some("csrf-1"));
        assert!(app.mutate_task().create_task(NewTask::new("late")).await.is_ok());
    }

    #[tokio::test]
    async fn start_runs_only_once() {
        let api = InMemoryTaskApi::new();
        let app = app(&api, CsrfMode::AwaitBeforeReady);

        app.start().await;
        app.start().await;

        let csrf_calls = api.calls().iter().filter(|c| **c == ApiCall::Csrf).count();
        assert_eq!(csrf_calls, 1);
    }

    #[tokio::test]
    async fn csrf_failure_is_absorbed() {
        let api = InMemoryTaskApi::new();
        api.fail_next_with_status(500);
        let app = app(&api, CsrfMode::AwaitBeforeReady);

        app.start().await;
        assert_eq!(api.csrf_token(), None);
    }

    #[tokio::test]
    async fn coordinators_share_the_cache() {
        let api = InMemoryTaskApi::new().with_tasks(vec![Task::new(TaskId::new(1), "a")]);
        let app = app(&api, CsrfMode::AwaitBeforeReady);
        app.start().await;

        app.query_tasks().fetch().await.unwrap();
        app.mutate_task().create_task(NewTask::new("b")).await.unwrap();

        let cached = app
            .query_client()
            .get_query_data::<Vec<Task>>(&QueryKey::tasks())
            .unwrap();
        let ids: Vec<i64> = cached.iter().map(|t| t.id.get()).collect();
        assert_eq!(ids, vec![2, 1]);
    }
}

//! InMemoryTaskApi - 開発・テスト用のバックエンド
//!
//! # 学習ポイント
//! - 本物のバックエンドと同じ振る舞い（連番採番、新しい順の一覧）をメモリ上で再現
//! - 失敗の注入（`fail_next`）で 401/403 などの経路をテストできる
//! - `require_csrf` で「トークン取得前のリクエストは 403」という競合を再現できる

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::{ApiError, EditedTask, NewTask, Task, TaskId};
use crate::ports::TaskApi;

/// 呼び出し記録（テストでの検証用）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    List,
    Create,
    Update(TaskId),
    Delete(TaskId),
    Csrf,
}

struct InMemoryState {
    /// 新しい順
    tasks: Vec<Task>,
    next_id: i64,
    failures: VecDeque<ApiError>,
    calls: Vec<ApiCall>,
    csrf_token: Option<String>,
    require_csrf: bool,
    issued_tokens: u64,
}

impl InMemoryState {
    fn allocate_id(&mut self) -> TaskId {
        let id = TaskId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// 注入された失敗があればそれを返す
    fn take_failure(&mut self) -> Result<(), ApiError> {
        match self.failures.pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// 状態を変える操作は CSRF トークンが必要
    fn check_csrf(&self) -> Result<(), ApiError> {
        if self.require_csrf && self.csrf_token.is_none() {
            return Err(ApiError::Status {
                status: 403,
                message: "invalid csrf token".to_string(),
            });
        }
        Ok(())
    }

    fn not_found(id: TaskId) -> ApiError {
        ApiError::Status {
            status: 404,
            message: format!("task {id} not found"),
        }
    }
}

/// InMemoryTaskApi は TaskApi のメモリ上の実装
///
/// clone は同じ状態を共有する。
#[derive(Clone)]
pub struct InMemoryTaskApi {
    state: Arc<Mutex<InMemoryState>>,
    csrf_delay: Duration,
}

impl InMemoryTaskApi {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(InMemoryState {
                tasks: Vec::new(),
                next_id: 1,
                failures: VecDeque::new(),
                calls: Vec::new(),
                csrf_token: None,
                require_csrf: false,
                issued_tokens: 0,
            })),
            csrf_delay: Duration::ZERO,
        }
    }

    /// 既存のタスクを持った状態で始める（新しい順で渡す）
    pub fn with_tasks(self, tasks: Vec<Task>) -> Self {
        {
            let mut state = self.state.lock();
            let max_id = tasks.iter().map(|t| t.id.get()).max().unwrap_or(0);
            state.next_id = state.next_id.max(max_id + 1);
            state.tasks = tasks;
        }
        self
    }

    pub fn require_csrf(self, required: bool) -> Self {
        self.state.lock().require_csrf = required;
        self
    }

    /// CSRF 取得にかかる時間（fire-and-forget の検証用）
    pub fn with_csrf_delay(mut self, delay: Duration) -> Self {
        self.csrf_delay = delay;
        self
    }

    /// 次の呼び出しを `err` で失敗させる（複数回呼ぶと順に消費）
    pub fn fail_next(&self, err: ApiError) {
        self.state.lock().failures.push_back(err);
    }

    pub fn fail_next_with_status(&self, status: u16) {
        self.fail_next(ApiError::Status {
            status,
            message: format!("injected status {status}"),
        });
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.state.lock().tasks.clone()
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.state.lock().calls.clone()
    }

    pub fn csrf_token(&self) -> Option<String> {
        self.state.lock().csrf_token.clone()
    }
}

impl Default for InMemoryTaskApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskApi for InMemoryTaskApi {
    async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        let mut state = self.state.lock();
        state.calls.push(ApiCall::List);
        state.take_failure()?;
        Ok(state.tasks.clone())
    }

    async fn create_task(&self, task: &NewTask) -> Result<Task, ApiError> {
        let mut state = self.state.lock();
        state.calls.push(ApiCall::Create);
        state.take_failure()?;
        state.check_csrf()?;

        let id = state.allocate_id();
        let created = Task {
            description: task.description.clone(),
            ..Task::new(id, task.title.clone())
        };
        state.tasks.insert(0, created.clone());
        Ok(created)
    }

    async fn update_task(&self, id: TaskId, task: &EditedTask) -> Result<Task, ApiError> {
        let mut state = self.state.lock();
        state.calls.push(ApiCall::Update(id));
        state.take_failure()?;
        state.check_csrf()?;

        let stored = state
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| InMemoryState::not_found(id))?;
        stored.title = task.title.clone();
        stored.description = task.description.clone();
        Ok(stored.clone())
    }

    async fn delete_task(&self, id: TaskId) -> Result<(), ApiError> {
        let mut state = self.state.lock();
        state.calls.push(ApiCall::Delete(id));
        state.take_failure()?;
        state.check_csrf()?;

        let before = state.tasks.len();
        state.tasks.retain(|t| t.id != id);
        if state.tasks.len() == before {
            return Err(InMemoryState::not_found(id));
        }
        Ok(())
    }

    async fn refresh_csrf_token(&self) -> Result<String, ApiError> {
        self.state.lock().calls.push(ApiCall::Csrf);
        if !self.csrf_delay.is_zero() {
            tokio::time::sleep(self.csrf_delay).await;
        }

        let mut state = self.state.lock();
        state.take_failure()?;
        state.issued_tokens += 1;
        let token = format!("csrf-{}", state.issued_tokens);
        state.csrf_token = Some(token.clone());
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_assigns_sequential_ids_newest_first() {
        let api = InMemoryTaskApi::new();
        let a = api.create_task(&NewTask::new("a")).await.unwrap();
        let b = api.create_task(&NewTask::new("b")).await.unwrap();

        assert_eq!(a.id, TaskId::new(1));
        assert_eq!(b.id, TaskId::new(2));
        let ids: Vec<i64> = api.tasks().iter().map(|t| t.id.get()).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn ids_continue_after_seeded_tasks() {
        let api = InMemoryTaskApi::new().with_tasks(vec![
            Task::new(TaskId::new(2), "b"),
            Task::new(TaskId::new(1), "a"),
        ]);
        let created = api.create_task(&NewTask::new("c")).await.unwrap();
        assert_eq!(created.id, TaskId::new(3));
    }

    #[tokio::test]
    async fn injected_failures_are_consumed_in_order() {
        let api = InMemoryTaskApi::new();
        api.fail_next_with_status(401);
        api.fail_next(ApiError::Transport("offline".into()));

        let first = api.list_tasks().await.unwrap_err();
        let second = api.list_tasks().await.unwrap_err();
        let third = api.list_tasks().await;

        assert_eq!(first.status(), Some(401));
        assert!(matches!(second, ApiError::Transport(_)));
        assert!(third.is_ok());
    }

    #[tokio::test]
    async fn mutations_need_csrf_when_required() {
        let api = InMemoryTaskApi::new().require_csrf(true);

        let err = api.create_task(&NewTask::new("a")).await.unwrap_err();
        assert_eq!(err.status(), Some(403));

        let token = api.refresh_csrf_token().await.unwrap();
        assert_eq!(token, "csrf-1");
        assert!(api.create_task(&NewTask::new("a")).await.is_ok());
    }

    #[tokio::test]
    async fn update_and_delete_unknown_ids_are_not_found() {
        let api = InMemoryTaskApi::new();
        let draft = EditedTask::new("x").with_id(TaskId::new(9));

        let err = api.update_task(TaskId::new(9), &draft).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        let err = api.delete_task(TaskId::new(9)).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }
}

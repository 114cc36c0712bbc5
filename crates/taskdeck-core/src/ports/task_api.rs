//! TaskApi port - REST バックエンドへの入り口
//!
//! | 操作 | Method | Path |
//! |---|---|---|
//! | list | GET | `/todo` |
//! | create | POST | `/todo` |
//! | update | PATCH | `/todo/{id}` |
//! | delete | DELETE | `/todo/{id}` |
//! | csrf | GET | `/auth/csrf` |
//!
//! # 実装
//! - **HttpTaskApi**: reqwest 経由の本番用
//! - **InMemoryTaskApi**: テスト・開発用

use async_trait::async_trait;

use crate::domain::{ApiError, EditedTask, NewTask, Task, TaskId};

/// TaskApi はタスクの CRUD と CSRF トークン取得を提供
///
/// # Thread Safety
/// - `Send + Sync` を要求（`Arc<dyn TaskApi>` で共有するため）
#[async_trait]
pub trait TaskApi: Send + Sync {
    async fn list_tasks(&self) -> Result<Vec<Task>, ApiError>;

    /// id はバックエンドが採番する
    async fn create_task(&self, task: &NewTask) -> Result<Task, ApiError>;

    /// `id` のタスクを `task` の内容で更新
    async fn update_task(&self, id: TaskId, task: &EditedTask) -> Result<Task, ApiError>;

    async fn delete_task(&self, id: TaskId) -> Result<(), ApiError>;

    /// CSRF トークンを取得し、以降のリクエストに付与する
    ///
    /// 取得したトークンを返す（ログ・テスト用）。
    async fn refresh_csrf_token(&self) -> Result<String, ApiError>;
}

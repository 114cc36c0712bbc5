//! MutateTask - タスクの create / update / delete
//!
//! # フロー（3 つとも同じ形）
//! 1. TaskApi でリモートを呼ぶ
//! 2. 成功: キャッシュ `["tasks"]` にスナップショットがあれば patch を当てる（再取得はしない）
//! 3. 成功・失敗どちらでも下書きを空にする
//! 4. 失敗: 401 / 403 なら入口 `/` へ遷移。それ以外は何もしない（リトライもしない）
//!
//! # マージキー
//! - update: レスポンスの id で置き換える
//! - delete: 引数の id で取り除く（レスポンスに id がないため）

use std::sync::Arc;

use tracing::{debug, warn};

use super::status::{MutationKind, MutationStatus, MutationTracker};
use crate::domain::{DraftStore, EditedTask, MutationError, NewTask, Task, TaskId};
use crate::ports::{Navigator, ROOT_ROUTE, TaskApi};
use crate::query::{QueryClient, QueryKey, patch};

/// MutateTask はタスクの mutation と、その完了時の副作用をまとめる
///
/// 各メソッドは完了ハンドラ（キャッシュ patch・下書きのリセット・遷移）を
/// すべて実行してから戻る。戻り値のエラーは確認用で、呼び出し側が捨ててもよい。
#[derive(Clone)]
pub struct MutateTask {
    api: Arc<dyn TaskApi>,
    query_client: QueryClient,
    drafts: DraftStore,
    navigator: Arc<dyn Navigator>,
    tracker: MutationTracker,
}

impl MutateTask {
    pub fn new(
        api: Arc<dyn TaskApi>,
        query_client: QueryClient,
        drafts: DraftStore,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            api,
            query_client,
            drafts,
            navigator,
            tracker: MutationTracker::new(),
        }
    }

    pub fn status(&self, kind: MutationKind) -> MutationStatus {
        self.tracker.get(kind)
    }

    pub fn is_pending(&self, kind: MutationKind) -> bool {
        self.status(kind) == MutationStatus::Pending
    }

    /// POST /todo。成功したら作成されたタスクを一覧の先頭に追加
    pub async fn create_task(&self, task: NewTask) -> Result<Task, MutationError> {
        self.tracker.set(MutationKind::Create, MutationStatus::Pending);
        match self.api.create_task(&task).await {
            Ok(created) => {
                let patched = self
                    .query_client
                    .update_query_data::<Vec<Task>, _>(&QueryKey::tasks(), |prev| {
                        patch::prepend(prev, created.clone())
                    });
                debug!(id = %created.id, patched, "task created");
                self.settle_success(MutationKind::Create);
                Ok(created)
            }
            Err(e) => Err(self.settle_error(MutationKind::Create, e.into())),
        }
    }

    /// PATCH /todo/{id}。成功したらレスポンスの id と同じ要素を置き換える
    pub async fn update_task(&self, task: EditedTask) -> Result<Task, MutationError> {
        self.tracker.set(MutationKind::Update, MutationStatus::Pending);
        let Some(id) = task.id else {
            return Err(self.settle_error(MutationKind::Update, MutationError::MissingId));
        };

        match self.api.update_task(id, &task).await {
            Ok(updated) => {
                let patched = self
                    .query_client
                    .update_query_data::<Vec<Task>, _>(&QueryKey::tasks(), |prev| {
                        patch::replace_by_id(prev, &updated)
                    });
                debug!(id = %updated.id, patched, "task updated");
                self.settle_success(MutationKind::Update);
                Ok(updated)
            }
            Err(e) => Err(self.settle_error(MutationKind::Update, e.into())),
        }
    }

    /// DELETE /todo/{id}。成功したら引数の id の要素を取り除く
    pub async fn delete_task(&self, id: TaskId) -> Result<(), MutationError> {
        self.tracker.set(MutationKind::Delete, MutationStatus::Pending);
        match self.api.delete_task(id).await {
            Ok(()) => {
                let patched = self
                    .query_client
                    .update_query_data::<Vec<Task>, _>(&QueryKey::tasks(), |prev| {
                        patch::remove_by_id(prev, id)
                    });
                debug!(%id, patched, "task deleted");
                self.settle_success(MutationKind::Delete);
                Ok(())
            }
            Err(e) => Err(self.settle_error(MutationKind::Delete, e.into())),
        }
    }

    /// 下書きを送信する（id がなければ create、あれば update）
    pub async fn submit_edited_task(&self) -> Result<Task, MutationError> {
        let Some(draft) = self.drafts.edited_task() else {
            return Err(MutationError::NoDraft);
        };
        if draft.is_new() {
            self.create_task(draft.into_new_task()).await
        } else {
            self.update_task(draft).await
        }
    }

    fn settle_success(&self, kind: MutationKind) {
        self.drafts.reset_edited_task();
        self.tracker.set(kind, MutationStatus::Success);
    }

    /// 失敗時の共通処理: 下書きを空にし、401/403 なら入口へ戻す
    fn settle_error(&self, kind: MutationKind, err: MutationError) -> MutationError {
        self.drafts.reset_edited_task();
        self.tracker.set(kind, MutationStatus::Error);
        if err.is_auth_failure() {
            warn!(?kind, error = %err, "not authorized, redirecting to {ROOT_ROUTE}");
            self.navigator.push(ROOT_ROUTE);
        } else {
            debug!(?kind, error = %err, "mutation failed");
        }
        err
    }
}

//! Task record and the request bodies built from it.
//!
//! バックエンドが返す Task のフィールドはこのコアにとって不透明です。
//! 既知のフィールドだけ型を付け、それ以外は `extra` にそのまま保持します。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TaskId;

/// Task はバックエンドが管理するタスク 1 件
///
/// # 不変条件
/// - `id` はサーバーが採番し、キャッシュ内で一意
/// - クライアントからは 3 つの mutation 経由でしか変化しない
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    /// 未知のフィールド（round-trip で落とさない）
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Task {
    pub fn new(id: TaskId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: None,
            created_at: None,
            updated_at: None,
            user_id: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// NewTask は Create の body（id はバックエンドが振るので持たない）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// EditedTask は編集中（または作成中）の下書き
///
/// - `id == None`: 新規作成中
/// - `id == Some(_)`: 既存タスクの編集中
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditedTask {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TaskId>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl EditedTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: None,
        }
    }

    pub fn with_id(mut self, id: TaskId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// 既存タスクを編集用の下書きにする
    pub fn from_task(task: &Task) -> Self {
        Self {
            id: Some(task.id),
            title: task.title.clone(),
            description: task.description.clone(),
        }
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Create 用の body に変換（id は捨てる）
    pub fn into_new_task(self) -> NewTask {
        NewTask {
            title: self.title,
            description: self.description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn task_keeps_unknown_fields() {
        let raw = json!({
            "id": 3,
            "title": "buy milk",
            "userId": 9,
            "priority": "high"
        });

        let task: Task = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(task.id, TaskId::new(3));
        assert_eq!(task.user_id, Some(9));
        assert_eq!(task.extra.get("priority"), Some(&json!("high")));

        let back = serde_json::to_value(&task).unwrap();
        assert_eq!(back, raw);
    }

    #[test]
    fn new_task_body_has_no_id() {
        let body = serde_json::to_value(EditedTask::new("x").with_id(TaskId::new(1)).into_new_task())
            .unwrap();
        assert_eq!(body, json!({ "title": "x" }));
    }

    #[test]
    fn edited_task_from_existing_task() {
        let task = Task::new(TaskId::new(5), "read").with_description("chapter 2");
        let draft = EditedTask::from_task(&task);
        assert!(!draft.is_new());
        assert_eq!(draft.id, Some(TaskId::new(5)));
        assert_eq!(draft.description.as_deref(), Some("chapter 2"));
    }
}

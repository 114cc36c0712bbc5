//! Cache patches applied after a successful mutation.
//!
//! すべて純粋関数です。キャッシュを再取得せず、mutation の結果だけで
//! 一覧を組み立て直します（optimistic cache patch）。

use crate::domain::{Task, TaskId};

/// 作成したタスクを先頭に追加: `[created] ++ tasks`
pub fn prepend(tasks: &[Task], created: Task) -> Vec<Task> {
    let mut next = Vec::with_capacity(tasks.len() + 1);
    next.push(created);
    next.extend_from_slice(tasks);
    next
}

/// `updated.id` と同じ id の要素だけを差し替える（順序はそのまま）
pub fn replace_by_id(tasks: &[Task], updated: &Task) -> Vec<Task> {
    tasks
        .iter()
        .map(|task| {
            if task.id == updated.id {
                updated.clone()
            } else {
                task.clone()
            }
        })
        .collect()
}

/// `id` の要素だけを取り除く（順序はそのまま）
pub fn remove_by_id(tasks: &[Task], id: TaskId) -> Vec<Task> {
    tasks.iter().filter(|task| task.id != id).cloned().collect()
}

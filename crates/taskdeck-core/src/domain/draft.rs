//! DraftStore - 編集中タスク（下書き）の共有状態
//!
//! # 学習ポイント
//! - グローバル変数ではなく、clone 可能なハンドルとして注入する
//! - `Arc<RwLock<_>>` を内側に持ち、clone は同じ状態を指す
//! - ロックは `.await` をまたがない短いクリティカルセクションのみ

use std::sync::Arc;

use parking_lot::RwLock;

use super::EditedTask;

/// DraftStore は「いま編集中のタスク」を高々 1 件保持する
///
/// mutation が成功しても失敗しても、最後に `reset_edited_task()` で空に戻す。
#[derive(Debug, Clone, Default)]
pub struct DraftStore {
    edited: Arc<RwLock<Option<EditedTask>>>,
}

impl DraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 現在の下書きのスナップショット
    pub fn edited_task(&self) -> Option<EditedTask> {
        self.edited.read().clone()
    }

    pub fn update_edited_task(&self, task: EditedTask) {
        *self.edited.write() = Some(task);
    }

    pub fn reset_edited_task(&self) {
        *self.edited.write() = None;
    }

    pub fn has_draft(&self) -> bool {
        self.edited.read().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_same_draft() {
        let store = DraftStore::new();
        let other = store.clone();

        store.update_edited_task(EditedTask::new("write report"));
        assert_eq!(
            other.edited_task().map(|t| t.title),
            Some("write report".to_string())
        );

        other.reset_edited_task();
        assert!(!store.has_draft());
    }
}

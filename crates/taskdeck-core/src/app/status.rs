//! Status - mutation ごとの進行状態
//!
//! UI はこれを見て「送信中はボタンを無効にする」などを決める。

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

/// どの mutation か
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

/// MutationStatus は直近の mutation の状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MutationStatus {
    #[default]
    Idle,
    Pending,
    Success,
    Error,
}

/// 同じ種類の mutation が並行した場合は、最後に記録したものが残る
#[derive(Debug, Clone, Default)]
pub struct MutationTracker {
    statuses: Arc<Mutex<HashMap<MutationKind, MutationStatus>>>,
}

impl MutationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: MutationKind) -> MutationStatus {
        self.statuses.lock().get(&kind).copied().unwrap_or_default()
    }

    pub fn set(&self, kind: MutationKind, status: MutationStatus) {
        self.statuses.lock().insert(kind, status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_kinds_are_idle() {
        let tracker = MutationTracker::new();
        assert_eq!(tracker.get(MutationKind::Delete), MutationStatus::Idle);

        tracker.set(MutationKind::Delete, MutationStatus::Pending);
        assert_eq!(tracker.get(MutationKind::Delete), MutationStatus::Pending);
        assert_eq!(tracker.get(MutationKind::Create), MutationStatus::Idle);
    }
}

//! Navigator 実装

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::warn;

use crate::ports::Navigator;

/// RecordingNavigator は遷移先を記録するだけ（テスト・ヘッドレス用）
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    history: Arc<Mutex<Vec<String>>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<String> {
        self.history.lock().clone()
    }

    pub fn current(&self) -> Option<String> {
        self.history.lock().last().cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn push(&self, route: &str) {
        self.history.lock().push(route.to_string());
    }
}

/// LogNavigator は遷移をログに出す（画面のない CLI 用）
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn push(&self, route: &str) {
        warn!(route, "not authorized, sign in again at the application entry point");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_routes_in_order() {
        let nav = RecordingNavigator::new();
        nav.push("/");
        nav.push("/todo");
        assert_eq!(nav.history(), vec!["/", "/todo"]);
        assert_eq!(nav.current().as_deref(), Some("/todo"));
    }
}

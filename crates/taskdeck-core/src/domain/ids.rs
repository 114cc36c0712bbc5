//! Domain identifiers (strongly-typed IDs).
//!
//! # サーバー採番の整数 ID
//! Task の ID はバックエンドが連番で振る整数です。クライアント側で生成することはありません。
//! そのため ULID のような生成器は持たず、newtype で包むだけにしています。
//!
//! ## なぜ newtype にするのか？
//! - `i64` のままだと「件数」や「インデックス」と混同できてしまう
//! - JSON 上は素の number のまま（`#[serde(transparent)]`）

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a Task record (assigned by the backend).
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(i64);

impl TaskId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl From<i64> for TaskId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

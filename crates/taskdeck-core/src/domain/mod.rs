//! Domain model (IDs, task records, drafts, errors).
//!
//! - ids: サーバー採番の TaskId
//! - task: Task / NewTask / EditedTask
//! - draft: 編集中タスクの共有状態（DraftStore）
//! - errors: ApiError / MutationError と 401・403 の分類

pub mod draft;
pub mod errors;
pub mod ids;
pub mod task;

pub use self::draft::DraftStore;
pub use self::errors::{ApiError, ErrorKind, MutationError};
pub use self::ids::TaskId;
pub use self::task::{EditedTask, NewTask, Task};

//! App - アプリケーション層
//!
//! このモジュールは、ports と query を組み合わせてアプリケーションロジックを実装します。
//!
//! # 主要コンポーネント
//! - **AppBuilder / App**: 起動時のワイヤリングと CSRF トークン取得
//! - **MutateTask**: create / update / delete とキャッシュ patch
//! - **QueryTasks**: 一覧の取得
//! - **Theme**: UI テーマの設定値
//! - **MutationStatus**: mutation ごとの進行状態

pub mod builder;
pub mod mutate_task;
pub mod query_tasks;
pub mod status;
pub mod theme;

// 主要な型を再エクスポート
pub use self::builder::{App, AppBuilder, BuildError, CsrfMode, bootstrap_query_config};
pub use self::mutate_task::MutateTask;
pub use self::query_tasks::QueryTasks;
pub use self::status::{MutationKind, MutationStatus};
pub use self::theme::{ColorScheme, Theme};

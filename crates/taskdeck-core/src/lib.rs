//! taskdeck-core
//!
//! Client-side data layer for the taskdeck task application.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（TaskId, Task, EditedTask, DraftStore, errors）
//! - **ports**: 抽象化レイヤー（TaskApi, Navigator）
//! - **impls**: 実装（ApiClient + HttpTaskApi, InMemoryTaskApi, RecordingNavigator）
//! - **query**: 共有キャッシュ（QueryClient, QueryKey, RetryPolicy, patch）
//! - **app**: アプリケーションロジック（AppBuilder, MutateTask, QueryTasks）
//! - **config**: 環境変数からの設定

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod ports;
pub mod query;

pub use app::{App, AppBuilder, CsrfMode, MutateTask, QueryTasks};
pub use config::Config;
pub use domain::{EditedTask, MutationError, NewTask, Task, TaskId};

//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **ApiClient**: 共通ヘッダーと cookie を共有する reqwest クライアント
//! - **HttpTaskApi**: 本番用の TaskApi
//! - **InMemoryTaskApi**: 開発・テスト用の TaskApi
//! - **RecordingNavigator / LogNavigator**: Navigator

pub mod api_client;
pub mod http_api;
pub mod inmem_api;
pub mod navigator;

pub use self::api_client::{ApiClient, ApiClientConfig, CSRF_HEADER};
pub use self::http_api::HttpTaskApi;
pub use self::inmem_api::{ApiCall, InMemoryTaskApi};
pub use self::navigator::{LogNavigator, RecordingNavigator};

//! Ports - 抽象化レイヤー
//!
//! このモジュールは Hexagonal Architecture の「ポート」を定義します。
//! 外の世界（REST バックエンド、ルーター）はすべて trait 越しに触ります。

pub mod navigator;
pub mod task_api;

pub use self::navigator::{Navigator, ROOT_ROUTE};
pub use self::task_api::TaskApi;

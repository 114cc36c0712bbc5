//! Query - 共有キャッシュとその周辺
//!
//! - **QueryClient**: key ごとのスナップショットを保持する共有キャッシュ
//! - **QueryKey**: スナップショットの識別子（`["tasks"]` など）
//! - **RetryPolicy**: 失敗したクエリの再試行ポリシー
//! - **patch**: mutation 成功時にキャッシュへ当てる純粋関数

pub mod cache;
pub mod key;
pub mod patch;
pub mod retry;

pub use self::cache::{QueryClient, QueryClientConfig};
pub use self::key::QueryKey;
pub use self::retry::RetryPolicy;

//! Navigator port - 画面遷移の抽象化
//!
//! 認可エラー（401/403）のときに入口 `/` へ戻すためだけに使う。

/// アプリケーションの入口（ログイン画面）
pub const ROOT_ROUTE: &str = "/";

/// Navigator はクライアントを別のルートへ遷移させる
pub trait Navigator: Send + Sync {
    fn push(&self, route: &str);
}

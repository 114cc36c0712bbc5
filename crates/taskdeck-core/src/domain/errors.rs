//! Errors - エラー型と分類
//!
//! # 分類
//! このクライアントが区別するのは 2 種類だけです。
//! - Unauthorized: HTTP 401 / 403（ログイン画面 `/` へ戻す）
//! - Other: それ以外すべて（ネットワークエラーや decode 失敗も含む）

use thiserror::Error;

/// ErrorKind は失敗の運用上の分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Unauthorized,
    Other,
}

impl ErrorKind {
    pub fn from_status(status: Option<u16>) -> Self {
        match status {
            Some(401) | Some(403) => ErrorKind::Unauthorized,
            _ => ErrorKind::Other,
        }
    }
}

/// ApiError は REST バックエンドとのやり取りで起きたエラー
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// サーバーが 2xx 以外を返した
    #[error("request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    /// 接続できなかった、タイムアウトした、など
    #[error("transport error: {0}")]
    Transport(String),

    /// レスポンス body を解釈できなかった
    #[error("decode error: {0}")]
    Decode(String),

    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        ErrorKind::from_status(self.status())
    }
}

/// MutationError は mutation 1 回分の失敗
#[derive(Debug, Clone, Error)]
pub enum MutationError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// 更新対象の下書きに id がない
    #[error("edited task has no id")]
    MissingId,

    /// 送信しようとしたが下書きがない
    #[error("no task is being edited")]
    NoDraft,
}

impl MutationError {
    pub fn status(&self) -> Option<u16> {
        match self {
            MutationError::Api(e) => e.status(),
            MutationError::MissingId | MutationError::NoDraft => None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        ErrorKind::from_status(self.status())
    }

    pub fn is_auth_failure(&self) -> bool {
        self.kind() == ErrorKind::Unauthorized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some(401), ErrorKind::Unauthorized)]
    #[case(Some(403), ErrorKind::Unauthorized)]
    #[case(Some(400), ErrorKind::Other)]
    #[case(Some(404), ErrorKind::Other)]
    #[case(Some(500), ErrorKind::Other)]
    #[case(None, ErrorKind::Other)]
    fn classify_status(#[case] status: Option<u16>, #[case] expected: ErrorKind) {
        assert_eq!(ErrorKind::from_status(status), expected);
    }

    #[test]
    fn transport_errors_are_not_auth_failures() {
        let err = MutationError::from(ApiError::Transport("connection refused".into()));
        assert_eq!(err.status(), None);
        assert!(!err.is_auth_failure());
    }

    #[test]
    fn status_error_message() {
        let err = ApiError::Status {
            status: 403,
            message: "invalid csrf token".into(),
        };
        assert_eq!(
            err.to_string(),
            "request failed with status 403: invalid csrf token"
        );
        assert!(MutationError::from(err).is_auth_failure());
    }
}

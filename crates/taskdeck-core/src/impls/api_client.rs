//! ApiClient - 共有 HTTP クライアント
//!
//! # 学習ポイント
//! - `reqwest::Client` は一度だけ作って clone で共有する（内部は Arc）
//! - Client の default headers は作成後に変えられないので、
//!   後から付与するヘッダー（csrf-token）は自前の `HeaderMap` に持ち、リクエストごとに載せる
//! - cookie store を有効にすると、サーバーが Set-Cookie したセッションが以降のリクエストに乗る

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::domain::ApiError;

/// CSRF トークンを載せるヘッダー名
pub const CSRF_HEADER: &str = "csrf-token";

/// ApiClientConfig は共有クライアントの作成パラメータ
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    pub base_url: Url,
    /// クロスオリジンでも cookie を送受信する
    pub with_credentials: bool,
    /// `None` ならタイムアウトなし
    pub timeout: Option<Duration>,
}

impl ApiClientConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            with_credentials: true,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// ApiClient はベース URL と共通ヘッダーを持つ HTTP クライアント
///
/// clone は同じ接続プール・cookie・共通ヘッダーを共有する。
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    http: reqwest::Client,
    default_headers: Arc<RwLock<HeaderMap>>,
    with_credentials: bool,
}

impl ApiClient {
    pub fn new(config: &ApiClientConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder().cookie_store(config.with_credentials);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ApiError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.base_url.clone(),
            http,
            default_headers: Arc::new(RwLock::new(HeaderMap::new())),
            with_credentials: config.with_credentials,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn with_credentials(&self) -> bool {
        self.with_credentials
    }

    /// 以降のすべてのリクエストに載せるヘッダーを設定
    pub fn set_default_header(&self, name: &str, value: &str) -> Result<(), ApiError> {
        let header = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ApiError::Decode(format!("invalid header name {name}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| ApiError::Decode(format!("invalid value for header {name}: {e}")))?;
        self.default_headers.write().insert(header, value);
        Ok(())
    }

    pub fn default_header(&self, name: &str) -> Option<String> {
        self.default_headers
            .read()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    /// ベース URL に path をつなげる
    ///
    /// `Url::join` は最後のセグメントを置き換えてしまうので、文字列でつなぐ。
    pub fn url(&self, path: &str) -> Result<Url, ApiError> {
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| ApiError::InvalidUrl(format!("{joined}: {e}")))
    }

    /// 共通ヘッダー付きのリクエストを組み立てる
    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.url(path)?;
        debug!(%method, %url, "api request");
        let headers = self.default_headers.read().clone();
        Ok(self.http.request(method, url).headers(headers))
    }

    /// 送信して JSON body を `T` に decode
    pub async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = Self::send(request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// 送信して body は捨てる
    pub async fn send_empty(&self, request: RequestBuilder) -> Result<(), ApiError> {
        Self::send(request).await.map(|_| ())
    }

    async fn send(request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = if body.is_empty() {
            status.canonical_reason().unwrap_or("unknown status").to_string()
        } else {
            body
        };
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

fn map_reqwest_error(e: reqwest::Error) -> ApiError {
    if e.is_decode() {
        ApiError::Decode(e.to_string())
    } else {
        ApiError::Transport(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(&ApiClientConfig::new(Url::parse(base).unwrap())).unwrap()
    }

    #[test]
    fn url_keeps_base_path() {
        let api = client("http://localhost:3005/api");
        assert_eq!(
            api.url("/todo/1").unwrap().as_str(),
            "http://localhost:3005/api/todo/1"
        );

        let api = client("http://localhost:3005/");
        assert_eq!(api.url("auth/csrf").unwrap().as_str(), "http://localhost:3005/auth/csrf");
    }

    #[test]
    fn default_headers_are_shared_between_clones() {
        let api = client("http://localhost:3005");
        let other = api.clone();

        api.set_default_header(CSRF_HEADER, "tok-1").unwrap();
        assert_eq!(other.default_header(CSRF_HEADER).as_deref(), Some("tok-1"));
    }

    #[test]
    fn invalid_header_value_is_rejected() {
        let api = client("http://localhost:3005");
        let err = api.set_default_header(CSRF_HEADER, "bad\nvalue").unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
        assert_eq!(api.default_header(CSRF_HEADER), None);
    }

    #[test]
    fn credentials_are_on_by_default() {
        assert!(client("http://localhost:3005").with_credentials());
    }

    #[tokio::test]
    async fn non_success_status_becomes_status_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("DELETE", "/todo/1")
            .with_status(403)
            .with_body("invalid csrf token")
            .create_async()
            .await;

        let api = client(&server.url());
        let request = api.request(Method::DELETE, "/todo/1").unwrap();
        let err = api.send_empty(request).await.unwrap_err();

        mock.assert_async().await;
        assert_eq!(err.status(), Some(403));
        assert!(err.to_string().contains("invalid csrf token"));
    }

    #[tokio::test]
    async fn empty_error_body_uses_reason_phrase() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/todo")
            .with_status(401)
            .create_async()
            .await;

        let api = client(&server.url());
        let request = api.request(Method::GET, "/todo").unwrap();
        let err = api.send_json::<serde_json::Value>(request).await.unwrap_err();

        match err {
            ApiError::Status { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Unauthorized");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

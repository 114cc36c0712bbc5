//! HttpTaskApi - REST バックエンドに対する TaskApi 実装

use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use tracing::debug;

use super::api_client::{ApiClient, CSRF_HEADER};
use crate::domain::{ApiError, EditedTask, NewTask, Task, TaskId};
use crate::ports::TaskApi;

const TODO_PATH: &str = "/todo";
const CSRF_PATH: &str = "/auth/csrf";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CsrfResponse {
    csrf_token: String,
}

/// HttpTaskApi は共有 `ApiClient` 越しにバックエンドを呼ぶ
#[derive(Debug, Clone)]
pub struct HttpTaskApi {
    client: ApiClient,
}

impl HttpTaskApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    fn task_path(id: TaskId) -> String {
        format!("{TODO_PATH}/{id}")
    }
}

#[async_trait]
impl TaskApi for HttpTaskApi {
    async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        let request = self.client.request(Method::GET, TODO_PATH)?;
        self.client.send_json(request).await
    }

    async fn create_task(&self, task: &NewTask) -> Result<Task, ApiError> {
        let request = self.client.request(Method::POST, TODO_PATH)?.json(task);
        self.client.send_json(request).await
    }

    async fn update_task(&self, id: TaskId, task: &EditedTask) -> Result<Task, ApiError> {
        let request = self
            .client
            .request(Method::PATCH, &Self::task_path(id))?
            .json(task);
        self.client.send_json(request).await
    }

    async fn delete_task(&self, id: TaskId) -> Result<(), ApiError> {
        let request = self.client.request(Method::DELETE, &Self::task_path(id))?;
        self.client.send_empty(request).await
    }

    async fn refresh_csrf_token(&self) -> Result<String, ApiError> {
        let request = self.client.request(Method::GET, CSRF_PATH)?;
        let response: CsrfResponse = self.client.send_json(request).await?;
        self.client
            .set_default_header(CSRF_HEADER, &response.csrf_token)?;
        debug!("csrf token attached to default headers");
        Ok(response.csrf_token)
    }
}

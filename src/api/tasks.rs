use super::client::ApiClient;
use super::error::ApiResult;
use crate::types::{Task, TaskDraft, TaskPatch};
use reqwest::Method;
use serde::Serialize;

#[derive(Serialize)]
struct CompletionRequest {
    completed: bool,
}

/// Returned by [`TaskService::delete`]; the server answers `204` with no body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Deleted {
    pub success: bool,
}

/// REST calls for the task resource. Every mutation returns the server's
/// canonical record.
#[derive(Clone)]
pub struct TaskService {
    client: ApiClient,
}

impl TaskService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> ApiResult<Vec<Task>> {
        self.client.get("/").await
    }

    pub async fn create(&self, draft: &TaskDraft) -> ApiResult<Task> {
        self.client.post("/", &draft.trimmed()).await
    }

    pub async fn update(&self, id: &str, patch: &TaskPatch) -> ApiResult<Task> {
        self.client
            .request_json(Method::PUT, &format!("/{id}"), Some(&patch.trimmed()))
            .await
    }

    pub async fn set_completed(&self, id: &str, completed: bool) -> ApiResult<Task> {
        self.client
            .request_json(
                Method::PATCH,
                &format!("/{id}/complete"),
                Some(&CompletionRequest { completed }),
            )
            .await
    }

    pub async fn delete(&self, id: &str) -> ApiResult<Deleted> {
        self.client
            .request::<serde_json::Value, ()>(Method::DELETE, &format!("/{id}"), None)
            .await?;
        Ok(Deleted { success: true })
    }
}

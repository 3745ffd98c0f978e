//! Task backend abstraction
//!
//! One trait covering the three backend endpoints the manager consumes:
//! submit, status fetch, delete. All calls are stateless per request.

use async_trait::async_trait;
use noteflow_client::{BackendClient, ClientError};
use noteflow_core::domain::task::TaskId;
use noteflow_core::dto::task::TaskStatusResponse;

/// Backend operations the task manager depends on
#[async_trait]
pub trait TaskBackend: Send + Sync {
    /// Submits a generation request and returns the id the backend assigned
    async fn submit_note(
        &self,
        platform: &str,
        payload: &serde_json::Value,
    ) -> Result<TaskId, ClientError>;

    /// Fetches the current status of a tracked task
    ///
    /// Idempotent; the poller calls this on every tick for every
    /// non-terminal task.
    async fn fetch_task_status(&self, id: &TaskId) -> Result<TaskStatusResponse, ClientError>;

    /// Deletes a task and its artifacts on the backend
    async fn delete_task(&self, platform: &str, id: &TaskId) -> Result<(), ClientError>;
}

/// HTTP implementation of [`TaskBackend`]
pub struct HttpTaskBackend {
    client: BackendClient,
}

impl HttpTaskBackend {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TaskBackend for HttpTaskBackend {
    async fn submit_note(
        &self,
        platform: &str,
        payload: &serde_json::Value,
    ) -> Result<TaskId, ClientError> {
        self.client.submit_note(platform, payload).await
    }

    async fn fetch_task_status(&self, id: &TaskId) -> Result<TaskStatusResponse, ClientError> {
        self.client.fetch_task_status(id).await
    }

    async fn delete_task(&self, platform: &str, id: &TaskId) -> Result<(), ClientError> {
        self.client.delete_task(platform, id).await
    }
}

//! Task-related API endpoints

use crate::BackendClient;
use crate::error::Result;
use noteflow_core::domain::task::TaskId;
use noteflow_core::dto::task::{
    DeleteTaskRequest, SubmitNoteRequest, SubmitNoteResponse, TaskStatusResponse,
};
use tracing::debug;

impl BackendClient {
    /// Submit a new note-generation request
    ///
    /// # Arguments
    /// * `platform` - Source platform of the media (e.g., "bilibili", "youtube")
    /// * `payload` - The full submission form payload
    ///
    /// # Returns
    /// The task id assigned by the backend
    pub async fn submit_note(
        &self,
        platform: &str,
        payload: &serde_json::Value,
    ) -> Result<TaskId> {
        let url = format!("{}/generate_note", self.base_url);
        debug!(%platform, "submitting note generation request");

        let request = SubmitNoteRequest {
            platform: platform.to_string(),
            payload: payload.clone(),
        };
        let response = self.client.post(&url).json(&request).send().await?;

        let ack: SubmitNoteResponse = self.handle_response(response).await?;
        Ok(ack.task_id)
    }

    /// Fetch the current status of a task
    ///
    /// Safe to call repeatedly; the backend treats this as a pure read.
    ///
    /// # Arguments
    /// * `task_id` - The task to query
    ///
    /// # Returns
    /// The reported status plus the generated note once one exists
    pub async fn fetch_task_status(&self, task_id: &TaskId) -> Result<TaskStatusResponse> {
        let url = format!("{}/task_status/{}", self.base_url, task_id);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Delete a task and its generated artifacts on the backend
    ///
    /// # Arguments
    /// * `platform` - Source platform the task was submitted for
    /// * `task_id` - The task to delete
    pub async fn delete_task(&self, platform: &str, task_id: &TaskId) -> Result<()> {
        let url = format!("{}/delete_task", self.base_url);
        debug!(%task_id, "requesting task deletion");

        let request = DeleteTaskRequest {
            platform: platform.to_string(),
            task_id: task_id.clone(),
        };
        let response = self.client.post(&url).json(&request).send().await?;

        self.handle_empty_response(response).await
    }
}

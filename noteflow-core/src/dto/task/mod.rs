//! Task DTOs for backend communication

use serde::{Deserialize, Serialize};

use crate::domain::task::{NoteResult, TaskId, TaskStatus};

/// Request to submit a new note-generation task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitNoteRequest {
    pub platform: String,
    pub payload: serde_json::Value,
}

/// Acknowledgement returned by the backend for an accepted submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitNoteResponse {
    pub task_id: TaskId,
}

/// Status report for a single task
///
/// `result` is only populated once the backend has something to show,
/// which in practice means the task reached `Success`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskStatusResponse {
    pub status: TaskStatus,
    pub result: Option<NoteResult>,
}

/// Request to delete a task and its generated artifacts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteTaskRequest {
    pub platform: String,
    pub task_id: TaskId,
}

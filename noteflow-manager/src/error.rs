//! Error types for the task manager

use noteflow_client::ClientError;
use noteflow_core::domain::task::TaskId;
use thiserror::Error;

/// Errors from the durable task store
#[derive(Debug, Error)]
pub enum StoreError {
    /// State file could not be read or written
    #[error("failed to access task state file: {0}")]
    Io(#[from] std::io::Error),

    /// State blob could not be encoded or decoded
    #[error("failed to encode task state: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors surfaced by the lifecycle controller
#[derive(Debug, Error)]
pub enum ManagerError {
    /// Backend rejected a new submission; no local state was created
    #[error("backend rejected submission: {0}")]
    Submission(#[source] ClientError),

    /// A backend call other than submission failed
    #[error("backend call failed: {0}")]
    Backend(#[source] ClientError),

    /// Operation referenced a task id the store does not know
    #[error("unknown task: {0}")]
    UnknownTask(TaskId),

    /// Store mutation failed to persist
    #[error(transparent)]
    Store(#[from] StoreError),
}

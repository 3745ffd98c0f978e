//! Task domain types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque task identifier assigned by the backend on submission.
///
/// Ids are never minted locally; the backend returns one when a generation
/// request is accepted, and it is immutable from then on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TaskId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Task status as reported by the backend
///
/// `Pending` and `Processing` are non-terminal; `Success` and `Failed` are
/// terminal. A task the backend has not yet acknowledged has no status at
/// all (`Option::None` on the record), which also counts as non-terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Pending,
    Processing,
    Success,
    Failed,
}

impl TaskStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Success | TaskStatus::Failed)
    }

    /// Position in the forward-only status ordering.
    ///
    /// An absent status ranks 0, so any backend report advances it. Both
    /// terminal states share the top rank; ties are resolved by never
    /// letting one terminal state replace the other.
    pub fn rank(self) -> u8 {
        match self {
            TaskStatus::Pending => 1,
            TaskStatus::Processing => 2,
            TaskStatus::Success | TaskStatus::Failed => 3,
        }
    }
}

/// Rank of an optional status, treating absence as the lowest rank.
pub fn status_rank(status: Option<TaskStatus>) -> u8 {
    status.map_or(0, TaskStatus::rank)
}

/// Generated note payload returned by the backend once a task succeeds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteResult {
    /// Rendered markdown body of the note
    pub markdown: Option<String>,
    /// Structured transcript, shape owned by the backend
    pub transcript: Option<serde_json::Value>,
}

/// One tracked note-generation task
///
/// `form_data` is the exact submission payload and is kept for the whole
/// life of the record, including after completion, so the originating form
/// can be re-rendered and resubmitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: TaskId,
    pub platform: String,
    pub form_data: serde_json::Value,
    pub status: Option<TaskStatus>,
    pub result: Option<NoteResult>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl TaskRecord {
    /// Creates a freshly submitted record in the `Pending` state
    pub fn new(id: TaskId, platform: impl Into<String>, form_data: serde_json::Value) -> Self {
        let now = chrono::Utc::now();
        Self {
            id,
            platform: platform.into(),
            form_data,
            status: Some(TaskStatus::Pending),
            result: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// True while the backend may still advance this task
    pub fn is_settled(&self) -> bool {
        self.status.is_some_and(TaskStatus::is_terminal)
    }
}

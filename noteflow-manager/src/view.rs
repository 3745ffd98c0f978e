//! Current-task projection
//!
//! A pure read of "what the UI should show right now", derived from the
//! store on every call. Nothing is cached, so the projection can never
//! drift from the record it mirrors.

use noteflow_core::domain::task::{TaskId, TaskRecord, TaskStatus};
use serde::Serialize;

use crate::store::TaskStore;

/// Render-ready view of the focused task
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskView {
    pub id: TaskId,
    pub platform: String,
    pub status: Option<TaskStatus>,
    /// True while the backend may still be working on the task; the UI
    /// renders both `Pending` and `Processing` (and a not-yet-acknowledged
    /// task) as "generating"
    pub generating: bool,
    pub markdown: Option<String>,
    pub transcript: Option<serde_json::Value>,
    /// Payload the task was submitted with, for re-rendering the form
    pub form_data: serde_json::Value,
}

impl From<TaskRecord> for TaskView {
    fn from(record: TaskRecord) -> Self {
        let generating = !record.is_settled();
        let (markdown, transcript) = match record.result {
            Some(result) => (result.markdown, result.transcript),
            None => (None, None),
        };

        Self {
            id: record.id,
            platform: record.platform,
            status: record.status,
            generating,
            markdown,
            transcript,
            form_data: record.form_data,
        }
    }
}

/// Recomputes the projection of the focused task
pub fn current_view(store: &TaskStore) -> Option<TaskView> {
    store.current().map(TaskView::from)
}

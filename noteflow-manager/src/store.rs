//! Durable task store
//!
//! Keeps the table of tracked tasks plus the single "current" focus pointer,
//! and persists both as one JSON blob so the table survives restarts. Every
//! mutation is a read-modify-write under one lock and rewrites the blob
//! before the lock is released, so callers racing on the same id cannot
//! lose updates.

use noteflow_core::domain::task::{NoteResult, TaskId, TaskRecord, TaskStatus, status_rank};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{debug, warn};

use crate::error::StoreError;

/// Serialized form of the whole store
///
/// Loaded in one piece at startup, rewritten in one piece on mutation.
#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedState {
    tasks: HashMap<TaskId, TaskRecord>,
    current: Option<TaskId>,
}

/// Durable key-value table of task records
pub struct TaskStore {
    state: Mutex<PersistedState>,
    path: Option<PathBuf>,
}

impl TaskStore {
    /// Creates an empty store with no backing file
    pub fn in_memory() -> Self {
        Self {
            state: Mutex::new(PersistedState::default()),
            path: None,
        }
    }

    /// Opens a store backed by `path`, loading any existing blob
    ///
    /// A missing file yields an empty store; a corrupt one is an error so
    /// the caller can decide whether to discard it.
    pub fn open(path: PathBuf) -> Result<Self, StoreError> {
        let state = match fs::read_to_string(&path) {
            Ok(blob) => serde_json::from_str(&blob)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => PersistedState::default(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            state: Mutex::new(state),
            path: Some(path),
        })
    }

    /// Inserts a record, or merges it into the existing one with the same id
    ///
    /// The merge never moves a status backward: a report of lower rank than
    /// the recorded one is ignored, and once a record is terminal only the
    /// identical status is accepted again. `created_at` of the existing
    /// record always wins.
    pub fn upsert(&self, incoming: TaskRecord) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();

        match state.tasks.get_mut(&incoming.id) {
            None => {
                state.tasks.insert(incoming.id.clone(), incoming);
            }
            Some(existing) => {
                if accepts_status(existing.status, incoming.status) {
                    existing.status = incoming.status;
                    if incoming.result.is_some() {
                        existing.result = incoming.result;
                    }
                } else {
                    debug!(id = %incoming.id, "discarding stale status in upsert");
                }
                existing.platform = incoming.platform;
                existing.form_data = incoming.form_data;
                existing.updated_at = chrono::Utc::now();
            }
        }

        self.persist(&state)
    }

    /// Merges a backend status report into an existing record
    ///
    /// Reports for ids no longer tracked are dropped, as are reports that
    /// would regress the recorded status. Returns whether anything changed.
    pub fn apply_status(
        &self,
        id: &TaskId,
        status: TaskStatus,
        result: Option<NoteResult>,
    ) -> Result<bool, StoreError> {
        let mut state = self.state.lock().unwrap();

        let Some(record) = state.tasks.get_mut(id) else {
            debug!(%id, "status report for untracked task, dropping");
            return Ok(false);
        };

        if !accepts_status(record.status, Some(status)) {
            debug!(%id, ?status, recorded = ?record.status, "discarding stale status report");
            return Ok(false);
        }

        record.status = Some(status);
        if result.is_some() {
            record.result = result;
        }
        record.updated_at = chrono::Utc::now();

        self.persist(&state)?;
        Ok(true)
    }

    /// Resets a record slot for a fresh attempt at the same logical task
    ///
    /// This is the one path that may move a terminal status back to
    /// `Pending`. The prior result is cleared and the payload replaced.
    /// When the backend issued a fresh id the slot is re-keyed and the
    /// focus pointer follows it. Returns false if the slot vanished in the
    /// meantime.
    pub fn reset_for_retry(
        &self,
        id: &TaskId,
        reissued_id: TaskId,
        form_data: serde_json::Value,
    ) -> Result<bool, StoreError> {
        let mut state = self.state.lock().unwrap();

        let Some(mut record) = state.tasks.remove(id) else {
            warn!(%id, "retry reset for unknown task, ignoring");
            return Ok(false);
        };

        record.id = reissued_id.clone();
        record.status = Some(TaskStatus::Pending);
        record.result = None;
        record.form_data = form_data;
        record.updated_at = chrono::Utc::now();
        state.tasks.insert(reissued_id.clone(), record);

        if state.current.as_ref() == Some(id) {
            state.current = Some(reissued_id);
        }

        self.persist(&state)?;
        Ok(true)
    }

    pub fn get(&self, id: &TaskId) -> Option<TaskRecord> {
        self.state.lock().unwrap().tasks.get(id).cloned()
    }

    /// Sets the focus pointer
    ///
    /// Pointing at an id the table does not contain is a no-op; callers
    /// must upsert before selecting.
    pub fn set_current(&self, id: Option<TaskId>) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();

        if let Some(ref id) = id {
            if !state.tasks.contains_key(id) {
                warn!(%id, "refusing to focus unknown task");
                return Ok(());
            }
        }

        state.current = id;
        self.persist(&state)
    }

    pub fn current_id(&self) -> Option<TaskId> {
        self.state.lock().unwrap().current.clone()
    }

    /// The record the focus pointer references, if any
    pub fn current(&self) -> Option<TaskRecord> {
        let state = self.state.lock().unwrap();
        state
            .current
            .as_ref()
            .and_then(|id| state.tasks.get(id))
            .cloned()
    }

    /// Removes a record; clears the focus pointer if it pointed there
    pub fn remove(&self, id: &TaskId) -> Result<bool, StoreError> {
        let mut state = self.state.lock().unwrap();

        if state.tasks.remove(id).is_none() {
            return Ok(false);
        }
        if state.current.as_ref() == Some(id) {
            state.current = None;
        }

        self.persist(&state)?;
        Ok(true)
    }

    /// Ids of every task the backend may still advance
    ///
    /// Tasks with no status yet count as non-terminal.
    pub fn list_non_terminal(&self) -> Vec<TaskId> {
        let state = self.state.lock().unwrap();
        state
            .tasks
            .values()
            .filter(|r| !r.is_settled())
            .map(|r| r.id.clone())
            .collect()
    }

    /// Most recently created record, used as a default focus after reload
    pub fn latest(&self) -> Option<TaskRecord> {
        let state = self.state.lock().unwrap();
        state.tasks.values().max_by_key(|r| r.created_at).cloned()
    }

    pub fn len(&self) -> usize {
        self.state.lock().unwrap().tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rewrites the whole blob; must be called with the state lock held
    ///
    /// Writes to a sibling temp file first and renames over the target so a
    /// crash mid-write cannot leave a truncated blob behind.
    fn persist(&self, state: &PersistedState) -> Result<(), StoreError> {
        let Some(ref path) = self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let blob = serde_json::to_string_pretty(state)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, blob)?;
        fs::rename(&tmp, path)?;

        Ok(())
    }
}

/// Whether a reported status may replace the recorded one
///
/// Forward-only: lower ranks are rejected, and a terminal status is only
/// ever replaced by itself (a late FAILED never overwrites SUCCESS).
fn accepts_status(recorded: Option<TaskStatus>, incoming: Option<TaskStatus>) -> bool {
    match (recorded, incoming) {
        (Some(cur), incoming) if cur.is_terminal() => incoming == Some(cur),
        (cur, inc) => status_rank(inc) >= status_rank(cur),
    }
}

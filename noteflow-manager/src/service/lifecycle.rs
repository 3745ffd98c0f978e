//! Task lifecycle controller
//!
//! Owns the invariants around submission, retry, focus selection and
//! deletion. Per task the state machine is
//! `NONE -> PENDING -> PROCESSING -> {SUCCESS | FAILED}` with one extra
//! edge, `{SUCCESS | FAILED} -> PENDING`, reachable only through
//! [`TaskManager::retry`] and never through polling.

use std::sync::Arc;
use tracing::info;

use noteflow_core::domain::task::{TaskId, TaskRecord};

use crate::error::ManagerError;
use crate::repository::TaskBackend;
use crate::store::TaskStore;

/// Lifecycle controller for note-generation tasks
pub struct TaskManager {
    store: Arc<TaskStore>,
    backend: Arc<dyn TaskBackend>,
}

impl TaskManager {
    pub fn new(store: Arc<TaskStore>, backend: Arc<dyn TaskBackend>) -> Self {
        Self { store, backend }
    }

    /// Submits a new generation request and focuses the resulting task
    ///
    /// A backend rejection surfaces as [`ManagerError::Submission`] and
    /// leaves the store untouched; retrying is an explicit user action,
    /// never automatic at this layer.
    pub async fn submit(
        &self,
        platform: &str,
        payload: serde_json::Value,
    ) -> Result<TaskId, ManagerError> {
        let id = self
            .backend
            .submit_note(platform, &payload)
            .await
            .map_err(ManagerError::Submission)?;

        self.store
            .upsert(TaskRecord::new(id.clone(), platform, payload))?;
        self.store.set_current(Some(id.clone()))?;

        info!(%id, %platform, "note generation task submitted");
        Ok(id)
    }

    /// Re-submits an existing task with a (possibly edited) payload
    ///
    /// The record slot is reused: status drops back to `Pending`, the prior
    /// result is cleared, and the poller picks the task up again on its
    /// next cycle. The focus pointer is left where it was, following the
    /// record if the backend reissued its id.
    pub async fn retry(
        &self,
        id: &TaskId,
        payload: serde_json::Value,
    ) -> Result<(), ManagerError> {
        let record = self
            .store
            .get(id)
            .ok_or_else(|| ManagerError::UnknownTask(id.clone()))?;

        let reissued = self
            .backend
            .submit_note(&record.platform, &payload)
            .await
            .map_err(ManagerError::Submission)?;

        self.store.reset_for_retry(id, reissued.clone(), payload)?;

        info!(%id, %reissued, "task resubmitted");
        Ok(())
    }

    /// Switches (or clears) the focused task
    ///
    /// Ids the store does not know are ignored; callers see the focus
    /// unchanged rather than a corrupted pointer.
    pub fn select_current(&self, id: Option<TaskId>) -> Result<(), ManagerError> {
        self.store.set_current(id)?;
        Ok(())
    }

    /// The focused task, if any
    pub fn current(&self) -> Option<TaskRecord> {
        self.store.current()
    }

    /// Deletes a task on the backend and drops the local record
    ///
    /// The focus pointer is cleared if it pointed at the deleted task. The
    /// local record survives a failed backend call.
    pub async fn delete(&self, id: &TaskId) -> Result<(), ManagerError> {
        let record = self
            .store
            .get(id)
            .ok_or_else(|| ManagerError::UnknownTask(id.clone()))?;

        self.backend
            .delete_task(&record.platform, id)
            .await
            .map_err(ManagerError::Backend)?;

        self.store.remove(id)?;

        info!(%id, "task deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::TaskPoller;
    use async_trait::async_trait;
    use noteflow_client::ClientError;
    use noteflow_core::domain::task::{NoteResult, TaskStatus};
    use noteflow_core::dto::task::TaskStatusResponse;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Backend double: scripted submission ids and status reports
    struct MockBackend {
        submissions: Mutex<VecDeque<Result<TaskId, ClientError>>>,
        reports: Mutex<VecDeque<TaskStatusResponse>>,
        deleted: Mutex<Vec<TaskId>>,
    }

    impl MockBackend {
        fn accepting(ids: Vec<&str>) -> Arc<Self> {
            Arc::new(Self {
                submissions: Mutex::new(ids.into_iter().map(|i| Ok(TaskId::from(i))).collect()),
                reports: Mutex::new(VecDeque::new()),
                deleted: Mutex::new(Vec::new()),
            })
        }

        fn rejecting() -> Arc<Self> {
            Arc::new(Self {
                submissions: Mutex::new(VecDeque::from([Err(ClientError::api_error(
                    422,
                    "invalid video url",
                ))])),
                reports: Mutex::new(VecDeque::new()),
                deleted: Mutex::new(Vec::new()),
            })
        }

        fn script_report(&self, status: TaskStatus, markdown: Option<&str>) {
            self.reports.lock().unwrap().push_back(TaskStatusResponse {
                status,
                result: markdown.map(|m| NoteResult {
                    markdown: Some(m.to_string()),
                    transcript: None,
                }),
            });
        }
    }

    #[async_trait]
    impl TaskBackend for MockBackend {
        async fn submit_note(
            &self,
            _platform: &str,
            _payload: &serde_json::Value,
        ) -> Result<TaskId, ClientError> {
            self.submissions
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ClientError::api_error(500, "no scripted submission")))
        }

        async fn fetch_task_status(
            &self,
            _id: &TaskId,
        ) -> Result<TaskStatusResponse, ClientError> {
            self.reports
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| ClientError::api_error(500, "no scripted report"))
        }

        async fn delete_task(&self, _platform: &str, id: &TaskId) -> Result<(), ClientError> {
            self.deleted.lock().unwrap().push(id.clone());
            Ok(())
        }
    }

    fn make_manager(backend: Arc<MockBackend>) -> (Arc<TaskStore>, TaskManager) {
        let store = Arc::new(TaskStore::in_memory());
        (Arc::clone(&store), TaskManager::new(store, backend))
    }

    #[tokio::test]
    async fn test_submit_focuses_pending_task() {
        let (_, manager) = make_manager(MockBackend::accepting(vec!["abc"]));

        let id = manager
            .submit("bilibili", json!({"video_url": "v1"}))
            .await
            .unwrap();

        let current = manager.current().unwrap();
        assert_eq!(current.id, id);
        assert_eq!(current.status, Some(TaskStatus::Pending));
        assert_eq!(current.form_data, json!({"video_url": "v1"}));
    }

    #[tokio::test]
    async fn test_rejected_submission_creates_no_state() {
        let (store, manager) = make_manager(MockBackend::rejecting());

        let err = manager
            .submit("bilibili", json!({"video_url": "bad"}))
            .await
            .unwrap_err();

        assert!(matches!(err, ManagerError::Submission(_)));
        assert!(store.is_empty());
        assert!(manager.current().is_none());
    }

    #[tokio::test]
    async fn test_retry_unknown_task_fails_fast() {
        let (store, manager) = make_manager(MockBackend::accepting(vec![]));

        let err = manager
            .retry(&TaskId::from("ghost"), json!({}))
            .await
            .unwrap_err();

        assert!(matches!(err, ManagerError::UnknownTask(_)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_retry_resets_completed_task() {
        let backend = MockBackend::accepting(vec!["abc", "abc"]);
        let (store, manager) = make_manager(Arc::clone(&backend));

        let id = manager
            .submit("bilibili", json!({"video_url": "v1"}))
            .await
            .unwrap();
        store
            .apply_status(
                &id,
                TaskStatus::Success,
                Some(NoteResult {
                    markdown: Some("# old".to_string()),
                    transcript: None,
                }),
            )
            .unwrap();

        manager
            .retry(&id, json!({"video_url": "v1", "style": "detailed"}))
            .await
            .unwrap();

        let reset = manager.current().unwrap();
        assert_eq!(reset.id, id);
        assert_eq!(reset.status, Some(TaskStatus::Pending));
        assert_eq!(reset.result, None);
        assert_eq!(reset.form_data, json!({"video_url": "v1", "style": "detailed"}));
        assert!(store.list_non_terminal().contains(&id));
    }

    #[tokio::test]
    async fn test_retry_follows_reissued_id() {
        let backend = MockBackend::accepting(vec!["abc", "def"]);
        let (store, manager) = make_manager(Arc::clone(&backend));

        let old = manager
            .submit("bilibili", json!({"video_url": "v1"}))
            .await
            .unwrap();

        manager.retry(&old, json!({"video_url": "v1"})).await.unwrap();

        assert!(store.get(&old).is_none());
        let current = manager.current().unwrap();
        assert_eq!(current.id, TaskId::from("def"));
        assert_eq!(current.status, Some(TaskStatus::Pending));
    }

    #[tokio::test]
    async fn test_select_current_switches_focus() {
        let backend = MockBackend::accepting(vec!["abc", "def"]);
        let (_, manager) = make_manager(Arc::clone(&backend));

        let first = manager.submit("bilibili", json!({"n": 1})).await.unwrap();
        let second = manager.submit("youtube", json!({"n": 2})).await.unwrap();
        assert_eq!(manager.current().unwrap().id, second);

        manager.select_current(Some(first.clone())).unwrap();
        assert_eq!(manager.current().unwrap().id, first);

        // "Start a new note" clears the focus entirely
        manager.select_current(None).unwrap();
        assert!(manager.current().is_none());

        // A dangling id leaves the focus untouched
        manager.select_current(Some(TaskId::from("ghost"))).unwrap();
        assert!(manager.current().is_none());
    }

    #[tokio::test]
    async fn test_delete_removes_record_and_focus() {
        let backend = MockBackend::accepting(vec!["abc"]);
        let (store, manager) = make_manager(Arc::clone(&backend));

        let id = manager.submit("bilibili", json!({"n": 1})).await.unwrap();
        manager.delete(&id).await.unwrap();

        assert!(store.is_empty());
        assert!(manager.current().is_none());
        assert_eq!(*backend.deleted.lock().unwrap(), vec![id]);
    }

    /// End-to-end walk of one task: submit, two poll cycles, a stale
    /// report, then a retry that brings the task back to life.
    #[tokio::test]
    async fn test_submit_poll_complete_retry_scenario() {
        let backend = MockBackend::accepting(vec!["abc", "abc"]);
        let (store, manager) = make_manager(Arc::clone(&backend));
        let poller = TaskPoller::new(
            Arc::clone(&store),
            backend.clone(),
            Duration::from_millis(10),
        );

        let id = manager
            .submit("bilibili", json!({"video_url": "v1"}))
            .await
            .unwrap();
        assert_eq!(manager.current().unwrap().status, Some(TaskStatus::Pending));

        backend.script_report(TaskStatus::Processing, None);
        for handle in poller.poll_once() {
            handle.await.unwrap();
        }
        assert_eq!(
            manager.current().unwrap().status,
            Some(TaskStatus::Processing)
        );

        backend.script_report(TaskStatus::Success, Some("# notes"));
        for handle in poller.poll_once() {
            handle.await.unwrap();
        }
        let done = manager.current().unwrap();
        assert_eq!(done.status, Some(TaskStatus::Success));
        assert_eq!(done.result.unwrap().markdown.as_deref(), Some("# notes"));

        // A network-delayed PROCESSING report arriving after SUCCESS is
        // discarded without regressing the record
        assert!(!store.apply_status(&id, TaskStatus::Processing, None).unwrap());
        assert_eq!(manager.current().unwrap().status, Some(TaskStatus::Success));

        manager.retry(&id, json!({"video_url": "v1"})).await.unwrap();
        let retried = manager.current().unwrap();
        assert_eq!(retried.status, Some(TaskStatus::Pending));
        assert!(retried.result.is_none());
        assert!(store.list_non_terminal().contains(&id));
    }
}

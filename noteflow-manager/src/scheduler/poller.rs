//! Task status poller
//!
//! Polls the backend for the status of every non-terminal task on a fixed
//! interval and merges the reports into the store. Fetches for independent
//! tasks fan out as separate tokio tasks so one slow response never delays
//! the others; a per-task in-flight guard keeps at most one outstanding
//! request per task when the backend is slower than the tick.
//!
//! Fetch failures are absorbed: the tick is skipped for that task and the
//! next one retries. There is no backoff and no attempt cutoff; a task is
//! polled until the backend reports a terminal status or the record is
//! removed.

use noteflow_core::domain::task::TaskId;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, error, info, warn};

use crate::repository::TaskBackend;
use crate::store::TaskStore;

/// Task status poller
pub struct TaskPoller {
    store: Arc<TaskStore>,
    backend: Arc<dyn TaskBackend>,
    poll_interval: Duration,
    started: AtomicBool,
    live: Arc<AtomicBool>,
    in_flight: Arc<Mutex<HashSet<TaskId>>>,
}

/// Handle to a running poller
///
/// Dropping the handle leaves the poller running; call
/// [`PollerHandle::shutdown`] to stop it. Results of fetches still in
/// flight at shutdown are discarded when they arrive.
pub struct PollerHandle {
    task: Option<JoinHandle<()>>,
    live: Arc<AtomicBool>,
}

impl PollerHandle {
    /// Whether this handle owns a running polling loop
    pub fn is_active(&self) -> bool {
        self.task.is_some()
    }

    /// Stops the polling loop and invalidates in-flight fetches
    pub fn shutdown(self) {
        self.live.store(false, Ordering::SeqCst);
        if let Some(task) = self.task {
            task.abort();
            info!("task poller stopped");
        }
    }
}

impl TaskPoller {
    /// Creates a new poller
    pub fn new(
        store: Arc<TaskStore>,
        backend: Arc<dyn TaskBackend>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            store,
            backend,
            poll_interval,
            started: AtomicBool::new(false),
            live: Arc::new(AtomicBool::new(true)),
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Starts the polling loop on the current runtime
    ///
    /// Starting is idempotent: a second call (hot re-initialization of the
    /// embedding application) logs a warning and returns an inert handle,
    /// so the poll rate never doubles.
    pub fn spawn(self: Arc<Self>) -> PollerHandle {
        if self.started.swap(true, Ordering::SeqCst) {
            warn!("task poller already started, ignoring duplicate start");
            return PollerHandle {
                task: None,
                live: Arc::new(AtomicBool::new(false)),
            };
        }

        self.live.store(true, Ordering::SeqCst);
        let live = Arc::clone(&self.live);
        let task = tokio::spawn(async move { self.run().await });

        PollerHandle {
            task: Some(task),
            live,
        }
    }

    /// The polling loop
    async fn run(&self) {
        info!(interval = ?self.poll_interval, "starting task poller");

        let mut interval = time::interval(self.poll_interval);

        loop {
            interval.tick().await;

            let issued = self.poll_once();
            if !issued.is_empty() {
                debug!(count = issued.len(), "issued status fetches");
            }
        }
    }

    /// Performs a single poll cycle
    ///
    /// Reads the non-terminal set once at the start of the cycle; a task
    /// that went terminal since the last tick is simply absent. When the
    /// set is empty no network traffic happens at all. Returns the handles
    /// of the fetches issued this cycle.
    pub fn poll_once(&self) -> Vec<JoinHandle<()>> {
        if !self.live.load(Ordering::SeqCst) {
            return Vec::new();
        }

        let ids = self.store.list_non_terminal();
        if ids.is_empty() {
            return Vec::new();
        }

        let mut handles = Vec::new();

        for id in ids {
            // Tick-skip guard: one outstanding request per task
            {
                let mut in_flight = self.in_flight.lock().unwrap();
                if !in_flight.insert(id.clone()) {
                    debug!(%id, "previous fetch still in flight, skipping");
                    continue;
                }
            }

            let store = Arc::clone(&self.store);
            let backend = Arc::clone(&self.backend);
            let live = Arc::clone(&self.live);
            let in_flight = Arc::clone(&self.in_flight);

            handles.push(tokio::spawn(async move {
                let outcome = backend.fetch_task_status(&id).await;
                in_flight.lock().unwrap().remove(&id);

                if !live.load(Ordering::SeqCst) {
                    debug!(%id, "poller stopped, discarding status report");
                    return;
                }

                match outcome {
                    Ok(report) => {
                        if let Err(e) = store.apply_status(&id, report.status, report.result) {
                            error!(%id, error = %e, "failed to record status report");
                        }
                    }
                    Err(e) => {
                        warn!(%id, error = %e, "status fetch failed, retrying next tick");
                    }
                }
            }));
        }

        handles
    }
}

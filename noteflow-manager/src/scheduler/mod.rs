//! Scheduler layer for the task manager
//!
//! Drives the periodic reconciliation between backend-reported status and
//! the local store: discover non-terminal tasks, fan out one status fetch
//! per task, merge the reports back in.

pub mod poller;

pub use poller::{PollerHandle, TaskPoller};

//! Repository layer
//!
//! Abstracts the note-generation backend behind a trait so the poller and
//! the lifecycle controller can be driven by a mock in tests. The only
//! production implementation delegates to [`noteflow_client::BackendClient`].

mod tasks;

pub use tasks::{HttpTaskBackend, TaskBackend};

//! Noteflow Task Manager
//!
//! The lifecycle manager for asynchronous note-generation tasks.
//!
//! Architecture:
//! - Store: durable table of tracked tasks plus the "current" focus pointer
//! - Repository: trait-based backend access (submit, status fetch, delete)
//! - Scheduler: fixed-interval polling that reconciles backend status
//! - Service: the lifecycle controller embedding code talks to
//! - View: pure projection of the current task for rendering
//!
//! The embedding application constructs one [`TaskStore`], one
//! [`TaskManager`] and one [`TaskPoller`] at startup, spawns the poller,
//! and shuts the poller down on exit. Nothing here installs a tracing
//! subscriber or owns a runtime; both belong to the host.

pub mod config;
pub mod error;
pub mod repository;
pub mod scheduler;
pub mod service;
pub mod store;
pub mod view;

pub use config::Config;
pub use error::{ManagerError, StoreError};
pub use repository::{HttpTaskBackend, TaskBackend};
pub use scheduler::{PollerHandle, TaskPoller};
pub use service::TaskManager;
pub use store::TaskStore;
pub use view::{TaskView, current_view};

//! Service layer
//!
//! The lifecycle controller is the single entry point embedding code uses
//! to mutate task state; the store is never exposed for direct writes from
//! UI-facing code.

mod lifecycle;

pub use lifecycle::TaskManager;

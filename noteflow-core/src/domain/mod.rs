//! Core domain types
//!
//! This module contains the domain structures shared across the Noteflow
//! crates. The manager persists them, the client deserializes into them.

pub mod task;

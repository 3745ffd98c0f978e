//! Noteflow Core
//!
//! Core types and abstractions for the Noteflow task subsystem.
//!
//! This crate contains:
//! - Domain types: Core business entities (TaskRecord, TaskStatus, etc.)
//! - DTOs: Data transfer objects exchanged with the note-generation backend

pub mod domain;
pub mod dto;

//! watchpoint - resume engine client for a streaming backend
//!
//! Determines what a user should watch, resume, or be offered next for a
//! catalog entity, and persists per-user playback progress against the
//! backend's REST API.
//!
//! # Modules
//!
//! - `models` - Catalog and progress data structures
//! - `error` - Shared error taxonomy
//! - `api` - REST clients (catalog, progress store)
//! - `resume` - Resume decision engine and session state machine
//! - `config` - Backend connection settings
//! - `cli` / `commands` - Scriptable command-line surface

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod resume;

// Re-export commonly used types
pub use api::{CatalogClient, ProgressClient};
pub use error::Error;
pub use models::{Entity, Episode, ProgressRecord, Season};
pub use resume::{
    PlayRequest, PlaybackSession, Resolution, ResumeEngine, SessionEnd, SessionState,
};

//! Error taxonomy shared by the API clients and the resume engine
//!
//! - `NotFound` is recoverable and surfaced as "content unavailable".
//! - `Conflict` is recovered internally by the engine (fallback to update)
//!   and never reaches callers of `finish`.
//! - `Request`/`Server` cover transport failures, timeouts and 5xx; they
//!   are transient and eligible for retry by the host application — this
//!   crate never retries on its own.
//! - `Validation` is fatal: the payload is malformed and retrying cannot
//!   help.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Resource not found (404)")]
    NotFound,

    #[error("Progress record already exists for this user and entity (409)")]
    Conflict,

    #[error("Server error: {0}")]
    Server(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid progress payload: {0}")]
    Validation(String),

    #[error("Session cancelled before completion")]
    Cancelled,

    #[error("Invalid session transition: {0}")]
    InvalidTransition(String),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl Error {
    /// Transport-level failure (timeout, connection, 5xx), retryable by
    /// the caller.
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Request(_) | Error::Server(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

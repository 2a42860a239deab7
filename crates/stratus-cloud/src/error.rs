//! Cloud driver error types

use crate::status::ServerStatus;
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by drivers and the core helpers
#[derive(Error, Debug)]
pub enum CloudError {
    /// Connection parameters or a server spec failed validation. Raised
    /// before any provider call is made.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The target status was not reached within the timeout. The provider
    /// mutation may still complete later; callers should re-poll status
    /// rather than reissue the mutation.
    #[error("timed out after {timeout:?} waiting for status `{target}` (last observed: `{last}`)")]
    Timeout {
        target: ServerStatus,
        last: ServerStatus,
        timeout: Duration,
    },

    /// The backend cannot fulfill this contract method for structural
    /// reasons. Distinct from "no matching value found".
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("provider API error: {0}")]
    Api(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CloudError>;

//! Error types for the autoscaler
//!
//! Centralized error handling using thiserror. Runtime failures of the two
//! HTTP collaborators have their own enums so the control loop can log and
//! absorb them; `AutoscalerError` covers everything that can stop startup.

use thiserror::Error;

/// Failure reading `<base>/app/status`
#[derive(Debug, Error)]
pub enum StatusFetchError {
    /// Connection, timeout or other transport-level failure
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The status endpoint answered with a non-success code
    #[error("status endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The body did not contain `cpu.highPriority` and `replicas`
    #[error("malformed status body: {0}")]
    Malformed(#[source] serde_json::Error),
}

/// Failure writing `<base>/app/replicas`
#[derive(Debug, Error)]
pub enum ReplicaUpdateError {
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("replica endpoint returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// All error types that can occur in the autoscaler
#[derive(Debug, Error)]
pub enum AutoscalerError {
    #[error("Error fetching current status: {0}")]
    StatusFetch(#[from] StatusFetchError),

    #[error("Error updating replica count: {0}")]
    ReplicaUpdate(#[from] ReplicaUpdateError),

    /// A configuration value is out of range or missing
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// The HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for autoscaler operations
pub type Result<T> = std::result::Result<T, AutoscalerError>;

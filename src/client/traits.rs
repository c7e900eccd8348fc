//! Trait seams for the status source and replica sink

use async_trait::async_trait;

use crate::domain::StatusSnapshot;
use crate::error::{ReplicaUpdateError, StatusFetchError};

/// Reads the workload's current utilization and replica count
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch_status(&self) -> Result<StatusSnapshot, StatusFetchError>;
}

/// Writes a desired replica count
#[async_trait]
pub trait ReplicaSink: Send + Sync {
    /// Returns the sink's status code on success
    async fn apply_replicas(&self, replicas: u32) -> Result<u16, ReplicaUpdateError>;
}

//! Status snapshot fetched once per poll cycle.

use serde::{Deserialize, Serialize};

/// Current high-priority CPU utilization and replica count of the workload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    /// Fraction in 0.0..=1.0 (not clamped; the policy only compares it)
    pub cpu: f64,
    pub replicas: u32,
}

impl StatusSnapshot {
    pub fn new(cpu: f64, replicas: u32) -> Self {
        Self { cpu, replicas }
    }
}

//! Control loop parameters, fixed for the life of the process.

use std::time::Duration;

use crate::error::{AutoscalerError, Result};

/// Default target utilization fraction
pub const DEFAULT_TARGET_CPU: f64 = 0.75;

/// Default half-width of the no-action band around the target
pub const DEFAULT_TOLERANCE: f64 = 0.05;

/// Default sleep between cycles
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Replica floor applied on the decrease path
pub const DEFAULT_MIN_REPLICAS: u32 = 2;

/// Default replicas added or removed per cycle
pub const DEFAULT_STEP: u32 = 1;

/// Configuration for the control loop
#[derive(Debug, Clone, PartialEq)]
pub struct ScalerConfig {
    /// Base address; `/app/status` and `/app/replicas` are appended
    pub base_url: String,
    pub target_cpu: f64,
    pub tolerance: f64,
    pub poll_interval: Duration,
    pub min_replicas: u32,
    pub step: u32,
    /// Log decisions without writing them to the replica endpoint
    pub dry_run: bool,
}

impl ScalerConfig {
    /// Create a config with default policy values for the given endpoint
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            target_cpu: DEFAULT_TARGET_CPU,
            tolerance: DEFAULT_TOLERANCE,
            poll_interval: DEFAULT_POLL_INTERVAL,
            min_replicas: DEFAULT_MIN_REPLICAS,
            step: DEFAULT_STEP,
            dry_run: false,
        }
    }

    pub fn with_target_cpu(mut self, target_cpu: f64) -> Self {
        self.target_cpu = target_cpu;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_min_replicas(mut self, min_replicas: u32) -> Self {
        self.min_replicas = min_replicas;
        self
    }

    pub fn with_step(mut self, step: u32) -> Self {
        self.step = step;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Check ranges; returns the config unchanged when valid
    pub fn validate(self) -> Result<Self> {
        let base = self.base_url.trim();
        if base.is_empty() {
            return Err(AutoscalerError::InvalidConfig("base_url is required".to_string()));
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(AutoscalerError::InvalidConfig(format!(
                "base_url must start with http:// or https://, got {}",
                base
            )));
        }
        if !(0.0..=1.0).contains(&self.target_cpu) {
            return Err(AutoscalerError::InvalidConfig(format!(
                "target_cpu must be within 0.0..=1.0, got {}",
                self.target_cpu
            )));
        }
        if !(0.0..=1.0).contains(&self.tolerance) {
            return Err(AutoscalerError::InvalidConfig(format!(
                "tolerance must be within 0.0..=1.0, got {}",
                self.tolerance
            )));
        }
        if self.poll_interval.is_zero() {
            return Err(AutoscalerError::InvalidConfig("poll_interval must be non-zero".to_string()));
        }
        if self.min_replicas < 1 {
            return Err(AutoscalerError::InvalidConfig("min_replicas must be at least 1".to_string()));
        }
        if self.step < 1 {
            return Err(AutoscalerError::InvalidConfig("step must be at least 1".to_string()));
        }
        Ok(self)
    }

    /// `base_url` without a trailing slash
    pub fn base(&self) -> &str {
        self.base_url.trim().trim_end_matches('/')
    }
}

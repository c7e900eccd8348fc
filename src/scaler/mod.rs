//! Scaler module - the autoscaler control loop.
//!
//! This module provides:
//! - ScalerConfig, the immutable loop parameters
//! - ControlLoop, which fetches status, decides and applies replica steps
//! - CycleOutcome / CycleStats for reporting what each cycle did

mod config;
mod control_loop;

pub use config::{
    DEFAULT_MIN_REPLICAS, DEFAULT_POLL_INTERVAL, DEFAULT_STEP, DEFAULT_TARGET_CPU, DEFAULT_TOLERANCE,
    ScalerConfig,
};
pub use control_loop::{ControlLoop, CycleOutcome, CycleStats, LoopState};

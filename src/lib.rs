//! Autoscaler - keeps a workload's CPU utilization near target
//!
//! Polls `<base>/app/status` on a fixed interval and steps the replica count
//! written to `<base>/app/replicas` by one whenever high-priority CPU leaves
//! the tolerance band around the target.

pub mod client;
pub mod domain;
pub mod error;
pub mod logging;
pub mod scaler;

pub use error::{AutoscalerError, Result};

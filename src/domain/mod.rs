//! Domain types for the autoscaler
//!
//! - StatusSnapshot: what the status endpoint reported for one cycle
//! - ScaleDecision: what the policy wants done with that snapshot
//!
//! Neither outlives a single poll cycle.

pub mod decision;
pub mod status;

pub use decision::{ScaleDecision, decide};
pub use status::StatusSnapshot;

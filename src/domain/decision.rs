//! Replica step policy.
//!
//! A damped proportional controller with a fixed step: at most one step
//! per cycle no matter how far utilization is from target.

use std::cmp::Ordering;
use std::fmt;

use crate::domain::StatusSnapshot;
use crate::scaler::ScalerConfig;

/// What the policy wants done with one snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleDecision {
    /// CPU above the band, or below it with the count under the floor
    Increase { from: u32, to: u32 },
    /// CPU below the band; `to` is never below the configured floor
    Decrease { from: u32, to: u32 },
    /// CPU inside the band (edges inclusive); nothing is written
    NoChange,
}

impl ScaleDecision {
    /// Replica count to write, or `None` when nothing should be written.
    pub fn target(&self) -> Option<u32> {
        match self {
            ScaleDecision::Increase { to, .. } | ScaleDecision::Decrease { to, .. } => Some(*to),
            ScaleDecision::NoChange => None,
        }
    }

    pub fn is_change(&self) -> bool {
        !matches!(self, ScaleDecision::NoChange)
    }

    /// Which way the written count moves; `Equal` for a floor rewrite or no change.
    pub fn direction(&self) -> Ordering {
        match self {
            ScaleDecision::Increase { from, to } | ScaleDecision::Decrease { from, to } => to.cmp(from),
            ScaleDecision::NoChange => Ordering::Equal,
        }
    }
}

impl fmt::Display for ScaleDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScaleDecision::Increase { from, to } => write!(f, "increase {} -> {}", from, to),
            ScaleDecision::Decrease { from, to } if from == to => write!(f, "hold {} at floor", to),
            ScaleDecision::Decrease { from, to } => write!(f, "decrease {} -> {}", from, to),
            ScaleDecision::NoChange => write!(f, "no change"),
        }
    }
}

/// Decide the next replica count from a snapshot.
///
/// Only strict inequalities against `target ± tolerance` trigger a change.
/// A decrease is floored at `min_replicas`: a workload at the floor is
/// rewritten at the floor, and one below it is lifted to the floor, which is
/// reported as an increase.
pub fn decide(snapshot: &StatusSnapshot, config: &ScalerConfig) -> ScaleDecision {
    let upper = config.target_cpu + config.tolerance;
    let lower = config.target_cpu - config.tolerance;
    let replicas = snapshot.replicas;

    if snapshot.cpu > upper {
        ScaleDecision::Increase {
            from: replicas,
            to: replicas.saturating_add(config.step),
        }
    } else if snapshot.cpu < lower {
        let to = replicas.saturating_sub(config.step).max(config.min_replicas);
        if to > replicas {
            ScaleDecision::Increase { from: replicas, to }
        } else {
            ScaleDecision::Decrease { from: replicas, to }
        }
    } else {
        ScaleDecision::NoChange
    }
}

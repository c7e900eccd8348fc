//! Control loop implementation - fetch, decide, apply, sleep.
//!
//! Each cycle performs at most one status fetch and at most one replica
//! write. Failures of either call are logged and absorbed; the loop stays
//! `Running` until the shutdown future resolves at a loop boundary.

use std::cmp::Ordering;
use std::future::Future;
use std::sync::Arc;

use log::{debug, error, info};

use crate::client::{ReplicaSink, StatusSource};
use crate::domain::{ScaleDecision, decide};
use crate::scaler::ScalerConfig;

/// Operating state of the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Terminated,
}

/// What happened during one cycle
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// The decision was written to the replica sink
    Applied(ScaleDecision),
    /// CPU inside the band; nothing written
    Unchanged { replicas: u32 },
    /// A change was decided but dry-run mode suppressed the write
    DryRun(ScaleDecision),
    /// Status could not be read; no decision was made
    FetchFailed(String),
    /// The write failed; the change is dropped for this cycle
    UpdateFailed { decision: ScaleDecision, error: String },
}

/// Counters accumulated over the life of the loop
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleStats {
    pub cycles: u64,
    pub scale_ups: u64,
    pub scale_downs: u64,
    pub unchanged: u64,
    pub dry_runs: u64,
    pub fetch_failures: u64,
    pub update_failures: u64,
}

impl CycleStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one cycle
    pub fn record(&mut self, outcome: &CycleOutcome) {
        self.cycles += 1;
        match outcome {
            CycleOutcome::Applied(decision) => match decision.direction() {
                Ordering::Greater => self.scale_ups += 1,
                Ordering::Less => self.scale_downs += 1,
                Ordering::Equal => self.unchanged += 1,
            },
            CycleOutcome::Unchanged { .. } => self.unchanged += 1,
            CycleOutcome::DryRun(_) => self.dry_runs += 1,
            CycleOutcome::FetchFailed(_) => self.fetch_failures += 1,
            CycleOutcome::UpdateFailed { .. } => self.update_failures += 1,
        }
    }
}

/// ControlLoop keeps a workload's CPU near target by stepping its replicas.
pub struct ControlLoop<S, K>
where
    S: StatusSource,
    K: ReplicaSink,
{
    source: Arc<S>,
    sink: Arc<K>,
    config: ScalerConfig,
    state: LoopState,
    stats: CycleStats,
}

impl<S, K> ControlLoop<S, K>
where
    S: StatusSource,
    K: ReplicaSink,
{
    /// Create a loop in the `Running` state.
    pub fn new(source: Arc<S>, sink: Arc<K>, config: ScalerConfig) -> Self {
        Self {
            source,
            sink,
            config,
            state: LoopState::Running,
            stats: CycleStats::new(),
        }
    }

    pub fn config(&self) -> &ScalerConfig {
        &self.config
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn stats(&self) -> &CycleStats {
        &self.stats
    }

    /// Run a single fetch/decide/apply cycle.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        let outcome = self.cycle().await;
        self.stats.record(&outcome);
        outcome
    }

    async fn cycle(&self) -> CycleOutcome {
        let snapshot = match self.source.fetch_status().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!("Error fetching current status: {}", e);
                return CycleOutcome::FetchFailed(e.to_string());
            }
        };

        let decision = decide(&snapshot, &self.config);
        debug!(
            "cpu={:.3} replicas={} band={:.3}..={:.3} decision: {}",
            snapshot.cpu,
            snapshot.replicas,
            self.config.target_cpu - self.config.tolerance,
            self.config.target_cpu + self.config.tolerance,
            decision
        );

        let Some(target) = decision.target() else {
            return CycleOutcome::Unchanged {
                replicas: snapshot.replicas,
            };
        };

        if self.config.dry_run {
            info!("Dry run: would {} (cpu={:.3})", decision, snapshot.cpu);
            return CycleOutcome::DryRun(decision);
        }

        match self.sink.apply_replicas(target).await {
            Ok(status) => {
                info!("Scaled: {} (cpu={:.3}, status {})", decision, snapshot.cpu, status);
                CycleOutcome::Applied(decision)
            }
            Err(e) => {
                error!("Error updating replica count: {}", e);
                CycleOutcome::UpdateFailed {
                    decision,
                    error: e.to_string(),
                }
            }
        }
    }

    /// Run cycles until `shutdown` resolves.
    ///
    /// `shutdown` is polled once before the first cycle, which runs
    /// immediately after. Shutdown is only observed between cycles, so an
    /// in-flight fetch or write always completes first.
    pub async fn run_until<F>(&mut self, shutdown: F) -> CycleStats
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        self.state = LoopState::Running;
        info!(
            "Auto-scaler started: base={} target={} tolerance={} interval={:?} floor={} step={}{}",
            self.config.base(),
            self.config.target_cpu,
            self.config.tolerance,
            self.config.poll_interval,
            self.config.min_replicas,
            self.config.step,
            if self.config.dry_run { " (dry run)" } else { "" }
        );

        // First poll arms listeners that register lazily (e.g. ctrl_c)
        let mut stop = tokio::select! {
            biased;
            () = &mut shutdown => true,
            () = std::future::ready(()) => false,
        };

        while !stop {
            self.run_cycle().await;

            stop = tokio::select! {
                biased;
                () = &mut shutdown => true,
                () = tokio::time::sleep(self.config.poll_interval) => false,
            };
        }

        self.state = LoopState::Terminated;
        info!("Auto-scaler terminated.");
        info!("Cycle summary: {:?}", self.stats);
        self.stats.clone()
    }
}

//! The scan loop.
//!
//! An [`Engine`] drives repeated fetch, evaluate and alert cycles:
//!
//! ```text
//! Idle -> Fetching -> Evaluating -> Alerting -> Waiting -> Fetching -> ... -> Stopped
//! ```
//!
//! Cycles never overlap. Cancellation is cooperative: the shutdown signal is
//! honoured while the fetch fan-in is pending and at the start of `Waiting`.
//! Deals already handed to the sinks are never lost.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info};

use super::fetch::{cancelled, FetchOrchestrator};
use super::settings::EngineConfig;
use crate::domain::{Deal, DealEvaluator, DedupStore, Predictor};
use crate::error::ConfigError;
use crate::notifier::{LogSink, SinkRegistry};
use crate::source::SourceRegistry;

/// Where the scan loop currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    Fetching,
    Evaluating,
    Alerting,
    Waiting,
    Stopped,
}

impl fmt::Display for ScanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Fetching => "fetching",
            Self::Evaluating => "evaluating",
            Self::Alerting => "alerting",
            Self::Waiting => "waiting",
            Self::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The requested number of cycles completed.
    IterationsReached,
    /// The shutdown signal fired.
    Cancelled,
}

/// Outcome of one completed cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    /// 1-based cycle number over the engine's lifetime.
    pub cycle: u64,
    /// Listings that survived deduplication.
    pub listings: usize,
    /// Deals delivered to the sinks.
    pub deals: usize,
}

/// Totals for one call to [`Engine::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub cycles: u64,
    pub listings: usize,
    pub deals: usize,
    pub stop_reason: StopReason,
}

pub struct Engine {
    config: EngineConfig,
    orchestrator: FetchOrchestrator,
    evaluator: DealEvaluator,
    sinks: SinkRegistry,
    state: ScanState,
    cycles: u64,
}

impl Engine {
    /// Build an engine over the sources `config` selects from `registry`.
    ///
    /// With no sinks registered, deals are logged via [`LogSink`].
    pub fn new(
        config: EngineConfig,
        registry: &SourceRegistry,
        mut sinks: SinkRegistry,
    ) -> Result<Self, ConfigError> {
        let sources = registry.select(config.active_sources())?;
        if sinks.is_empty() {
            sinks.register(Box::new(LogSink));
        }

        let orchestrator = FetchOrchestrator::new(
            sources,
            config.source_timeout(),
            Arc::new(DedupStore::new()),
        );
        let evaluator = DealEvaluator::new(config.deal_threshold());

        info!(
            sources = ?orchestrator.source_names(),
            terms = ?config.search_terms(),
            threshold = %config.deal_threshold(),
            "Engine ready"
        );

        Ok(Self {
            config,
            orchestrator,
            evaluator,
            sinks,
            state: ScanState::Idle,
            cycles: 0,
        })
    }

    /// Replace the value predictor.
    #[must_use]
    pub fn with_predictor(mut self, predictor: Arc<dyn Predictor>) -> Self {
        self.evaluator = DealEvaluator::with_predictor(self.config.deal_threshold(), predictor);
        self
    }

    /// Share an existing dedup store instead of starting empty.
    #[must_use]
    pub fn with_dedup_store(mut self, store: Arc<DedupStore>) -> Self {
        self.orchestrator.set_dedup(store);
        self
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Cycles completed over the engine's lifetime.
    #[must_use]
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    #[must_use]
    pub fn dedup_store(&self) -> &Arc<DedupStore> {
        self.orchestrator.dedup()
    }

    /// Forget every listing surfaced so far.
    pub fn prune(&self) {
        let forgotten = self.dedup_store().len();
        self.dedup_store().prune();
        info!(forgotten, "Dedup store pruned");
    }

    fn transition(&mut self, next: ScanState) {
        if self.state != next {
            debug!(from = %self.state, to = %next, "Scan state change");
            self.state = next;
        }
    }

    /// Run a single fetch, evaluate and alert cycle.
    ///
    /// Returns `None` if `shutdown` fired before the fetch completed; the
    /// engine is then `Stopped` and nothing was alerted.
    pub async fn run_cycle(
        &mut self,
        shutdown: &mut watch::Receiver<bool>,
    ) -> Option<CycleReport> {
        let cycle = self.cycles + 1;
        self.transition(ScanState::Fetching);

        let Some(listings) = self
            .orchestrator
            .fetch_until(self.config.search_terms(), shutdown)
            .await
        else {
            info!(cycle, "Shutdown during fetch");
            self.transition(ScanState::Stopped);
            return None;
        };

        self.transition(ScanState::Evaluating);
        let fresh = listings.len();
        let deals: Vec<Deal> = self.evaluator.evaluate(listings).collect();

        self.transition(ScanState::Alerting);
        for deal in &deals {
            self.sinks.notify_all(deal);
        }

        self.cycles = cycle;
        info!(cycle, listings = fresh, deals = deals.len(), "Cycle complete");
        Some(CycleReport {
            cycle,
            listings: fresh,
            deals: deals.len(),
        })
    }

    /// Run cycles until `iterations` have completed or `shutdown` fires.
    ///
    /// `None` runs until cancelled. `Some(0)` stops without fetching. There is
    /// no wait after the final cycle, and a zero refresh interval starts the
    /// next cycle immediately.
    pub async fn run(
        &mut self,
        iterations: Option<u64>,
        mut shutdown: watch::Receiver<bool>,
    ) -> RunSummary {
        let interval = self.config.refresh_interval();
        let mut summary = RunSummary {
            cycles: 0,
            listings: 0,
            deals: 0,
            stop_reason: StopReason::IterationsReached,
        };
        let done = |cycles: u64| iterations.is_some_and(|limit| cycles >= limit);

        info!(
            iterations = ?iterations,
            interval_secs = interval.as_secs(),
            "Scan loop starting"
        );

        while !done(summary.cycles) {
            let Some(report) = self.run_cycle(&mut shutdown).await else {
                summary.stop_reason = StopReason::Cancelled;
                break;
            };
            summary.cycles += 1;
            summary.listings += report.listings;
            summary.deals += report.deals;

            if done(summary.cycles) {
                break;
            }

            self.transition(ScanState::Waiting);
            if *shutdown.borrow() {
                summary.stop_reason = StopReason::Cancelled;
                break;
            }
            if interval.is_zero() {
                tokio::task::yield_now().await;
                continue;
            }
            tokio::select! {
                biased;
                () = cancelled(&mut shutdown) => {
                    summary.stop_reason = StopReason::Cancelled;
                    break;
                }
                () = tokio::time::sleep(interval) => {}
            }
        }

        self.transition(ScanState::Stopped);
        info!(
            cycles = summary.cycles,
            deals = summary.deals,
            reason = ?summary.stop_reason,
            "Scan loop stopped"
        );
        summary
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("cycles", &self.cycles)
            .finish_non_exhaustive()
    }
}

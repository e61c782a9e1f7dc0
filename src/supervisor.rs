//! The sensor poll loop.
//!
//! One task owns the tracked state and cycles through
//! fetch -> match -> detect -> dispatch, sleeping a fixed interval between
//! successful cycles. Connection resets are retried immediately and without
//! limit; any other fetch error ends the loop.

use crate::error::Result;
use crate::hue::SensorSource;
use crate::notify::EventDispatcher;
use crate::sensors::{SensorSnapshot, TrackedState, detect, match_all};
use crate::switches::SwitchRegistry;
use log::{error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Where the loop currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollPhase {
    /// Constructed, no cycle started yet.
    Idle,
    /// A fetch/match/detect/dispatch cycle is in progress.
    Polling,
    /// Between cycles, waiting for the next tick.
    Sleeping,
    /// A fatal fetch error ended polling.
    Failed,
}

/// Counters since the loop was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollStats {
    /// Completed cycles.
    pub cycles: u64,
    /// Connection resets absorbed.
    pub resets: u64,
    /// Events dispatched.
    pub events: u64,
}

pub struct PollSupervisor {
    source: Arc<dyn SensorSource>,
    registry: SwitchRegistry,
    dispatcher: EventDispatcher,
    interval: Duration,
    tracked: TrackedState,
    phase: PollPhase,
    stats: PollStats,
}

impl PollSupervisor {
    pub fn new(
        source: Arc<dyn SensorSource>,
        registry: SwitchRegistry,
        dispatcher: EventDispatcher,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            registry,
            dispatcher,
            interval,
            tracked: TrackedState::new(),
            phase: PollPhase::Idle,
            stats: PollStats::default(),
        }
    }

    pub fn phase(&self) -> PollPhase {
        self.phase
    }

    pub fn stats(&self) -> PollStats {
        self.stats
    }

    /// State retained from the last successful cycle.
    pub fn tracked(&self) -> &TrackedState {
        &self.tracked
    }

    /// Run one full Polling phase and return the number of events dispatched.
    ///
    /// The tracked state is replaced only after a successful fetch; a fatal
    /// error leaves it untouched. Ends in [`PollPhase::Sleeping`] on success
    /// and [`PollPhase::Failed`] otherwise.
    pub async fn poll_once(&mut self) -> Result<usize> {
        self.phase = PollPhase::Polling;

        let snapshot = match self.fetch().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                self.phase = PollPhase::Failed;
                return Err(e);
            }
        };
        let candidate = match_all(&snapshot, &self.registry);

        let mut dispatched = 0;
        for event in detect(&self.tracked, &candidate) {
            self.dispatcher.dispatch(&event).await;
            dispatched += 1;
        }

        self.tracked = candidate;
        self.stats.cycles += 1;
        self.stats.events += dispatched as u64;
        self.phase = PollPhase::Sleeping;
        Ok(dispatched)
    }

    async fn fetch(&mut self) -> Result<SensorSnapshot> {
        loop {
            match self.source.request_sensor_list().await {
                Ok(snapshot) => return Ok(snapshot),
                Err(e) if e.is_recoverable() => {
                    self.stats.resets += 1;
                    warn!("[Poll] {}, retrying", e);
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Poll until `token` is cancelled or a fatal error occurs.
    ///
    /// Cancellation is observed between cycles only.
    pub async fn run(mut self, token: CancellationToken) -> Result<()> {
        info!(
            "[Poll] Watching {} switch(es) every {:?}",
            self.registry.len(),
            self.interval
        );

        while !token.is_cancelled() {
            if let Err(e) = self.poll_once().await {
                error!("[Poll] Sensor monitoring stopped: {}", e);
                return Err(e);
            }

            tokio::select! {
                _ = token.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        info!(
            "[Poll] Stopped after {} cycles ({} events, {} resets)",
            self.stats.cycles, self.stats.events, self.stats.resets
        );
        Ok(())
    }

    /// Spawn the loop as a background task.
    pub fn start(self, token: CancellationToken) -> JoinHandle<Result<()>> {
        tokio::spawn(self.run(token))
    }
}

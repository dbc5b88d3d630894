//! Debounced short-link uniqueness probe with cancellation
//!
//! Every edit retires the previous probe before anything else happens, so
//! a result can only ever apply to the value that scheduled it.

use crate::api::{ApiError, CategoryService};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

/// How long the short link must rest before a probe fires
pub const SETTLE_DELAY: Duration = Duration::from_millis(1000);

/// Minimum time the checking indicator stays visible once shown
pub const MIN_CHECKING_DELAY: Duration = Duration::from_millis(500);

/// Lifecycle of the short-link uniqueness answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UniquenessState {
    /// No answer for the current value
    #[default]
    Unknown,
    /// An edit happened recently; a probe is scheduled but has not fired
    Debouncing,
    /// A probe is in flight
    Checking,
    /// The backend reported the short link as taken
    Exists,
    /// The backend reported the short link as free
    Available,
}

impl UniquenessState {
    /// States in which submission must stay disabled
    pub fn blocks_submission(&self) -> bool {
        matches!(self, Self::Debouncing | Self::Checking | Self::Exists)
    }
}

/// Timing knobs for the probe
#[derive(Debug, Clone, Copy)]
pub struct ProbeTiming {
    pub settle: Duration,
    pub min_visible: Duration,
}

impl Default for ProbeTiming {
    fn default() -> Self {
        Self {
            settle: SETTLE_DELAY,
            min_visible: MIN_CHECKING_DELAY,
        }
    }
}

/// Events sent from probe tasks back to the owning session
#[derive(Debug)]
pub(crate) enum ProbeEvent {
    /// The settle delay elapsed and the backend call is starting
    Started { generation: u64 },
    /// The backend answered and the minimum display time has passed
    Finished {
        generation: u64,
        outcome: Result<bool, ApiError>,
    },
}

/// Owner of the in-flight probe task, keyed by generation
pub(crate) struct ProbeRunner {
    generation: u64,
    in_flight: Option<CancellationToken>,
    events: mpsc::UnboundedSender<ProbeEvent>,
}

impl ProbeRunner {
    pub(crate) fn new(events: mpsc::UnboundedSender<ProbeEvent>) -> Self {
        Self {
            generation: 0,
            in_flight: None,
            events,
        }
    }

    /// Whether an event belongs to the most recently scheduled probe
    pub(crate) fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// Invalidate the previous probe: bump the generation so queued events
    /// go stale, and cancel the task if one is still running
    pub(crate) fn retire(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if let Some(cancel) = self.in_flight.take() {
            cancel.cancel();
        }
    }

    /// Spawn a probe for this guid under the current generation
    pub(crate) fn schedule(
        &mut self,
        guid: String,
        service: Arc<dyn CategoryService>,
        timing: ProbeTiming,
    ) {
        let generation = self.generation;
        let cancel = CancellationToken::new();
        self.in_flight = Some(cancel.clone());
        let events = self.events.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = sleep(timing.settle) => {}
            }

            if events.send(ProbeEvent::Started { generation }).is_err() {
                return;
            }

            let outcome = service.guid_exists(&guid).await;

            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = sleep(timing.min_visible) => {}
            }

            if cancel.is_cancelled() {
                return;
            }

            let _ = events.send(ProbeEvent::Finished { generation, outcome });
        });
    }
}

impl Drop for ProbeRunner {
    fn drop(&mut self) {
        if let Some(cancel) = self.in_flight.take() {
            cancel.cancel();
        }
    }
}

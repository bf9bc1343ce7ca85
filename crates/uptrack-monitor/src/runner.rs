//! The scheduler loop: strictly sequential cycles, drift-corrected pacing.
//!
//! One cycle runs at a time; the next never starts before the previous has
//! fully merged. After each cycle the loop sleeps for whatever remains of
//! the interval. A cycle that overran the interval yields a zero pause and
//! the next cycle starts immediately; the pause is never stretched to
//! compensate.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use uptrack_config::EndpointSpec;
use uptrack_probe::Prober;

use crate::cycle::{CycleStats, run_cycle};
use crate::ledger::AvailabilityLedger;
use crate::report::{CycleReport, ReportSink};

/// Timing of one completed cycle.
#[derive(Debug, Clone, Copy)]
pub struct CycleRecord {
    /// Wall-clock time the cycle started.
    pub started_at: DateTime<Utc>,
    /// Wall-clock time the cycle finished merging.
    pub ended_at: DateTime<Utc>,
    /// Monotonic cycle duration.
    pub duration: Duration,
}

/// Remaining pause for the current interval: `interval - elapsed`, clamped
/// at zero when the cycle overran it.
pub fn pacing_sleep(interval: Duration, elapsed: Duration) -> Duration {
    interval.saturating_sub(elapsed)
}

/// The polling loop: owns the ledger, runs cycles, reports, paces.
pub struct Monitor {
    prober: Prober,
    endpoints: Arc<[EndpointSpec]>,
    interval: Duration,
    sink: Box<dyn ReportSink>,
    ledger: AvailabilityLedger,
}

impl Monitor {
    /// Create a monitor over a fixed endpoint list.
    pub fn new(
        prober: Prober,
        endpoints: Vec<EndpointSpec>,
        interval: Duration,
        sink: Box<dyn ReportSink>,
    ) -> Self {
        Self {
            prober,
            endpoints: endpoints.into(),
            interval,
            sink,
            ledger: AvailabilityLedger::new(),
        }
    }

    /// Run exactly one cycle and emit its report.
    pub async fn run_once(&mut self) -> CycleStats {
        let checked_at = Utc::now();
        let stats = run_cycle(&self.prober, &self.endpoints, &mut self.ledger).await;
        let report = CycleReport::from_snapshot(checked_at, self.interval, &self.ledger.snapshot());
        self.sink.emit(&report);
        stats
    }

    /// Run cycles until `shutdown` flips.
    ///
    /// Cancellation is prompt: both the in-flight cycle and the pacing
    /// sleep race the shutdown signal. Probes still on the wire when the
    /// signal lands are left to finish on their own; their outcomes are
    /// discarded.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!(
            endpoints = self.endpoints.len(),
            interval_secs = self.interval.as_secs(),
            "monitor started"
        );

        loop {
            let started_at = Utc::now();
            let started = Instant::now();

            let stats = tokio::select! {
                stats = self.run_once() => stats,
                _ = shutdown.changed() => {
                    info!("monitor shutting down mid-cycle");
                    break;
                }
            };

            let record = CycleRecord {
                started_at,
                ended_at: Utc::now(),
                duration: started.elapsed(),
            };
            debug!(
                up = stats.up,
                down = stats.down,
                started_at = %record.started_at,
                duration_ms = record.duration.as_millis() as u64,
                "cycle completed"
            );

            let pause = pacing_sleep(self.interval, record.duration);
            if pause.is_zero() {
                warn!(
                    duration_ms = record.duration.as_millis() as u64,
                    interval_secs = self.interval.as_secs(),
                    "cycle used up the whole interval, starting the next one immediately"
                );
                continue;
            }

            tokio::select! {
                _ = sleep(pause) => {}
                _ = shutdown.changed() => {
                    info!("monitor shutting down");
                    break;
                }
            }
        }
    }
}

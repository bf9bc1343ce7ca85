//! uptrack-monitor: the polling cycle engine.
//!
//! Owns everything between a loaded endpoint list and an emitted
//! availability report: the per-cycle fan-out, the cumulative ledger, and
//! the drift-corrected pacing loop.
//!
//! # Architecture
//!
//! ```text
//! Monitor::run (one cycle at a time, until shutdown)
//!   ├── run_cycle: one probe task per endpoint
//!   │     ├── Semaphore caps in-flight probes
//!   │     └── mpsc channel funnels outcomes to the single ledger writer
//!   ├── CycleReport → ReportSink (console by default)
//!   └── pacing_sleep(interval, cycle duration), clamped at zero
//! ```
//!
//! Counters are cumulative: availability percentages cover the whole run,
//! not just the latest cycle. A probe failure only ever costs its own
//! observation; the rest of the batch and the loop itself keep going.

pub mod cycle;
pub mod ledger;
pub mod report;
pub mod runner;

pub use cycle::{CycleStats, MAX_CONCURRENT_PROBES, run_cycle};
pub use ledger::{AvailabilityLedger, HostStats};
pub use report::{ConsoleSink, CycleReport, HostAvailability, ReportSink};
pub use runner::{CycleRecord, Monitor, pacing_sleep};

//! uptrack-probe: single-attempt HTTP probes.
//!
//! A [`Prober`] issues one request per endpoint per cycle, measures
//! wall-clock latency to response completion, and classifies the result
//! into a [`ProbeOutcome`]. An endpoint counts as up only when it answers
//! with a 2xx status under the latency threshold. Transport failures never
//! escape the prober; they come back as outcomes carrying a
//! [`FailureKind`].

pub mod outcome;
pub mod prober;

pub use outcome::{FailureKind, ProbeOutcome};
pub use prober::{DEFAULT_LATENCY_THRESHOLD, DEFAULT_TIMEOUT, Prober};

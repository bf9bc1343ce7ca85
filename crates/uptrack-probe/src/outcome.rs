//! Probe outcome types.

use std::fmt;
use std::time::Duration;

/// Transport-level failure classification.
///
/// Only set when no HTTP response was produced at all. A non-2xx status or
/// an over-threshold latency is a normal negative observation, not a
/// failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Connection could not be established (refused, reset, DNS).
    ConnectionFailed,
    /// The request deadline elapsed before a response completed.
    TimedOut,
    /// Any other transport fault.
    Other,
}

impl FailureKind {
    /// Short lowercase name for log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::ConnectionFailed => "connection_failed",
            FailureKind::TimedOut => "timed_out",
            FailureKind::Other => "other",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The result of one probe attempt against one endpoint.
///
/// Every attempt produces exactly one outcome, whatever happened on the
/// wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    /// Aggregation key: the probed URL's host.
    pub host: String,
    /// Whether this observation counts as up.
    pub succeeded: bool,
    /// Wall-clock time from request start to response completion or
    /// failure.
    pub latency: Duration,
    /// HTTP status code, when a response arrived.
    pub status: Option<u16>,
    /// Failure classification, when none did.
    pub error: Option<FailureKind>,
}

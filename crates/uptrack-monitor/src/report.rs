//! Cycle reporting: the structured report record and the console sink.
//!
//! Reports are plain output, not log lines. The tracing stream carries the
//! operational story; the report sink carries the availability numbers an
//! operator actually watches.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::ledger::HostStats;

/// Availability line for one host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostAvailability {
    pub host: String,
    pub up: u64,
    pub total: u64,
    pub percentage: u32,
}

/// Everything one cycle reports: when it ran, how it paces, and where
/// availability stands for every host observed so far.
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    /// Wall-clock time the cycle started.
    pub checked_at: DateTime<Utc>,
    /// Configured pacing interval.
    pub interval: Duration,
    /// Per-host availability, ordered by host.
    pub hosts: Vec<HostAvailability>,
}

impl CycleReport {
    /// Build a report from a ledger snapshot.
    pub fn from_snapshot(
        checked_at: DateTime<Utc>,
        interval: Duration,
        counters: &BTreeMap<String, HostStats>,
    ) -> Self {
        let hosts = counters
            .iter()
            .map(|(host, stats)| HostAvailability {
                host: host.clone(),
                up: stats.up,
                total: stats.total,
                percentage: stats.percentage(),
            })
            .collect();
        Self {
            checked_at,
            interval,
            hosts,
        }
    }

    /// Console form: a timestamp line, the interval, one availability line
    /// per host, and a blank separator after the block.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Availability at {}",
            self.checked_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        );
        let _ = writeln!(out, "Interval: {}s", self.interval.as_secs());
        for host in &self.hosts {
            let _ = writeln!(out, "{} has {}% availability", host.host, host.percentage);
        }
        out.push('\n');
        out
    }
}

/// Where cycle reports go. The monitor only ever talks to this seam.
pub trait ReportSink: Send + Sync {
    /// Deliver one cycle's report.
    fn emit(&self, report: &CycleReport);
}

/// Prints the console form to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl ReportSink for ConsoleSink {
    fn emit(&self, report: &CycleReport) {
        print!("{}", report.render());
    }
}

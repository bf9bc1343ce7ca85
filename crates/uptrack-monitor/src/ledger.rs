//! Availability ledger: cumulative per-host up/total counters.

use std::collections::{BTreeMap, HashMap};

use uptrack_probe::ProbeOutcome;

/// Counters for one host. `up` never exceeds `total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostStats {
    /// Observations classified as up.
    pub up: u64,
    /// All observations for this host.
    pub total: u64,
}

impl HostStats {
    /// Availability as a whole percentage, rounded to the nearest point.
    ///
    /// A host with no observations reads as 0.
    pub fn percentage(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (100.0 * self.up as f64 / self.total as f64).round() as u32
    }
}

/// Cumulative availability counters keyed by host.
///
/// Counters span the whole run and are never reset between cycles. The
/// cycle coordinator is the only writer; everyone else reads through
/// [`AvailabilityLedger::snapshot`].
#[derive(Debug, Default)]
pub struct AvailabilityLedger {
    hosts: HashMap<String, HostStats>,
}

impl AvailabilityLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one outcome in: bumps `total`, and `up` when the probe counted
    /// as up. The host entry is created on first observation.
    pub fn record(&mut self, outcome: &ProbeOutcome) {
        let stats = self.hosts.entry(outcome.host.clone()).or_default();
        stats.total += 1;
        if outcome.succeeded {
            stats.up += 1;
        }
    }

    /// Point-in-time copy of all counters, ordered by host so reports are
    /// stable run to run.
    pub fn snapshot(&self) -> BTreeMap<String, HostStats> {
        self.hosts
            .iter()
            .map(|(host, stats)| (host.clone(), *stats))
            .collect()
    }

    /// Number of hosts observed so far.
    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    /// True when no host has been observed yet.
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

//! One polling cycle: concurrent fan-out, single-writer aggregation.
//!
//! Every endpoint is probed on its own task; outcomes funnel through an
//! mpsc channel into the ledger. The coordinator is the channel's only
//! consumer, so ledger writes are serialized without a lock, and the cycle
//! ends exactly when the last probe task has reported in.

use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tracing::debug;

use uptrack_config::EndpointSpec;
use uptrack_probe::Prober;

use crate::ledger::AvailabilityLedger;

/// Upper bound on in-flight probes within one cycle.
pub const MAX_CONCURRENT_PROBES: usize = 64;

/// Per-cycle tallies, for log lines and one-shot runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleStats {
    /// Probes that counted as up.
    pub up: usize,
    /// Probes that counted as down, transport failures included.
    pub down: usize,
}

impl CycleStats {
    /// Total probes observed this cycle.
    pub fn total(&self) -> usize {
        self.up + self.down
    }
}

/// Run one full cycle: probe every endpoint concurrently and fold all
/// outcomes into the ledger.
///
/// Returns only after every probe has produced its outcome; the channel
/// closes when the last producer task drops its sender. A failing probe is
/// isolated to its own outcome and cannot disturb the rest of the batch.
pub async fn run_cycle(
    prober: &Prober,
    endpoints: &[EndpointSpec],
    ledger: &mut AvailabilityLedger,
) -> CycleStats {
    let mut stats = CycleStats::default();
    if endpoints.is_empty() {
        return stats;
    }

    let (tx, mut rx) = mpsc::channel(endpoints.len());
    let limiter = Arc::new(Semaphore::new(MAX_CONCURRENT_PROBES));

    for endpoint in endpoints {
        let endpoint = endpoint.clone();
        let prober = prober.clone();
        let tx = tx.clone();
        let limiter = limiter.clone();
        tokio::spawn(async move {
            // The semaphore is never closed; acquisition only waits.
            let _permit = limiter.acquire_owned().await.ok();
            let outcome = prober.probe(&endpoint).await;
            // Send fails only when the cycle itself was cancelled.
            let _ = tx.send(outcome).await;
        });
    }
    drop(tx);

    while let Some(outcome) = rx.recv().await {
        if outcome.succeeded {
            stats.up += 1;
        } else {
            stats.down += 1;
        }
        ledger.record(&outcome);
    }

    debug!(up = stats.up, down = stats.down, "cycle outcomes merged");
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::HostStats;
    use std::time::{Duration, Instant};
    use uptrack_probe::DEFAULT_LATENCY_THRESHOLD;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_prober() -> Prober {
        Prober::new(Duration::from_secs(2), DEFAULT_LATENCY_THRESHOLD).unwrap()
    }

    fn endpoint(server: &MockServer, route: &str) -> EndpointSpec {
        EndpointSpec::get(&format!("{}{}", server.uri(), route)).unwrap()
    }

    async fn mount(server: &MockServer, route: &str, status: u16) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn every_endpoint_lands_in_the_ledger() {
        let server = MockServer::start().await;
        mount(&server, "/ok", 200).await;
        mount(&server, "/bad", 503).await;

        let endpoints = vec![endpoint(&server, "/ok"), endpoint(&server, "/bad")];
        let mut ledger = AvailabilityLedger::new();
        let stats = run_cycle(&test_prober(), &endpoints, &mut ledger).await;

        assert_eq!(stats, CycleStats { up: 1, down: 1 });
        assert_eq!(stats.total(), 2);
        assert_eq!(
            ledger.snapshot()["127.0.0.1"],
            HostStats { up: 1, total: 2 }
        );
    }

    #[tokio::test]
    async fn one_dead_endpoint_cannot_sink_the_batch() {
        let server = MockServer::start().await;
        mount(&server, "/ok", 200).await;

        let endpoints = vec![
            endpoint(&server, "/ok"),
            // Nothing listens on port 1; host resolves but the connection drops.
            EndpointSpec::get("http://localhost:1/dead").unwrap(),
        ];
        let mut ledger = AvailabilityLedger::new();
        let stats = run_cycle(&test_prober(), &endpoints, &mut ledger).await;

        assert_eq!(stats, CycleStats { up: 1, down: 1 });
        let counters = ledger.snapshot();
        assert_eq!(counters["127.0.0.1"].up, 1);
        assert_eq!(counters["localhost"].total, 1);
        assert_eq!(counters["localhost"].up, 0);
    }

    #[tokio::test]
    async fn counters_accumulate_across_cycles() {
        let server = MockServer::start().await;
        mount(&server, "/ok", 200).await;

        let endpoints = vec![endpoint(&server, "/ok")];
        let prober = test_prober();
        let mut ledger = AvailabilityLedger::new();

        for _ in 0..5 {
            run_cycle(&prober, &endpoints, &mut ledger).await;
        }

        let stats = ledger.snapshot()["127.0.0.1"];
        assert_eq!(stats, HostStats { up: 5, total: 5 });
        assert_eq!(stats.percentage(), 100);
    }

    #[tokio::test]
    async fn a_never_responding_host_counts_once_per_cycle() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/hang"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
            .mount(&server)
            .await;

        let prober = Prober::new(Duration::from_millis(100), DEFAULT_LATENCY_THRESHOLD).unwrap();
        let endpoints = vec![endpoint(&server, "/hang")];
        let mut ledger = AvailabilityLedger::new();

        for _ in 0..3 {
            let stats = run_cycle(&prober, &endpoints, &mut ledger).await;
            assert_eq!(stats, CycleStats { up: 0, down: 1 });
        }

        let stats = ledger.snapshot()["127.0.0.1"];
        assert_eq!(stats, HostStats { up: 0, total: 3 });
        assert_eq!(stats.percentage(), 0);
    }

    #[tokio::test]
    async fn same_host_descriptors_share_one_counter() {
        let server = MockServer::start().await;
        mount(&server, "/a", 200).await;
        mount(&server, "/b", 500).await;

        let endpoints = vec![endpoint(&server, "/a"), endpoint(&server, "/b")];
        let mut ledger = AvailabilityLedger::new();
        run_cycle(&test_prober(), &endpoints, &mut ledger).await;

        let counters = ledger.snapshot();
        assert_eq!(counters.len(), 1);
        assert_eq!(
            counters["127.0.0.1"],
            HostStats { up: 1, total: 2 }
        );
    }

    #[tokio::test]
    async fn empty_endpoint_list_is_a_no_op() {
        let mut ledger = AvailabilityLedger::new();
        let stats = run_cycle(&test_prober(), &[], &mut ledger).await;
        assert_eq!(stats, CycleStats::default());
        assert!(ledger.is_empty());
    }

    #[tokio::test]
    async fn probes_fan_out_concurrently() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(300)))
            .mount(&server)
            .await;

        let endpoints = vec![
            endpoint(&server, "/slow"),
            endpoint(&server, "/slow"),
            endpoint(&server, "/slow"),
        ];
        let mut ledger = AvailabilityLedger::new();

        let started = Instant::now();
        let stats = run_cycle(&test_prober(), &endpoints, &mut ledger).await;
        let elapsed = started.elapsed();

        assert_eq!(stats.total(), 3);
        // Three sequential probes would take at least 900ms.
        assert!(elapsed < Duration::from_millis(700), "cycle took {elapsed:?}");
    }

    #[tokio::test]
    async fn availability_dips_when_a_cycle_fails() {
        let server = MockServer::start().await;
        // Two good answers, then one bad, then good again.
        Mock::given(method("GET"))
            .and(path("/flappy"))
            .respond_with(ResponseTemplate::new(200))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/flappy"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/flappy"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let endpoints = vec![endpoint(&server, "/flappy")];
        let prober = test_prober();
        let mut ledger = AvailabilityLedger::new();

        for _ in 0..5 {
            run_cycle(&prober, &endpoints, &mut ledger).await;
        }

        let stats = ledger.snapshot()["127.0.0.1"];
        assert_eq!(stats, HostStats { up: 4, total: 5 });
        assert_eq!(stats.percentage(), 80);
    }
}

//! # Scan orchestration
//!
//! Drives a scan from expanded targets to the final [`ScanReport`]:
//!
//! 1. **Discovery** (when the method asks for it): every target gets an ICMP echo through
//!    the worker pool. Down targets are skipped, inconclusive ones kept.
//! 2. **Port scan**: every live target is crossed with every port and probed by TCP
//!    connect.
//!
//! All outcomes are folded into one [`Aggregator`] owned by the task running the scan.

use std::net::IpAddr;
use std::sync::Arc;

use scanr_common::config::ScanConfig;
use scanr_common::network::{PortSpec, Target};
use scanr_common::report::{Liveness, ProbeResult, ScanReport};
use scanr_common::{info, success, warn};
use tracing::debug;

use crate::aggregate::Aggregator;
use crate::pool::{Progress, WorkerPool};
use crate::prober::{NetProber, Prober};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Discovery,
    PortScan,
}

pub type ProgressHook = Arc<dyn Fn(Phase, Progress) + Send + Sync>;

pub struct Scanner {
    prober: Arc<dyn Prober>,
    config: ScanConfig,
    on_progress: Option<ProgressHook>,
}

impl Scanner {
    pub fn new(config: ScanConfig) -> Self {
        Self::with_prober(Arc::new(NetProber), config)
    }

    pub fn with_prober(prober: Arc<dyn Prober>, config: ScanConfig) -> Self {
        Self {
            prober,
            config,
            on_progress: None,
        }
    }

    /// Called with `completed == 0` when a phase starts, then as the pool reports.
    pub fn on_progress(mut self, hook: impl Fn(Phase, Progress) + Send + Sync + 'static) -> Self {
        self.on_progress = Some(Arc::new(hook));
        self
    }

    /// Runs discovery and/or the port scan over `targets` and builds the report.
    ///
    /// Never fails: unreachable hosts, closed ports and dropped probes are all part of the
    /// result.
    pub async fn run(&self, targets: Vec<Target>, ports: &PortSpec) -> ScanReport {
        let mut aggregator: Aggregator = if self.config.should_discover(targets.len()) {
            self.discover(targets).await
        } else {
            debug!("skipping discovery for {} targets", targets.len());
            Aggregator::assume_up(targets)
        };

        if self.config.should_scan_ports() {
            self.scan_ports(&mut aggregator, ports).await;
        }

        aggregator.finish()
    }

    async fn discover(&self, targets: Vec<Target>) -> Aggregator {
        let total: usize = targets.len();
        let timeout = self.config.timeout;
        let verbose: bool = self.config.verbose;
        let pool = WorkerPool::new(
            self.config.workers,
            self.config.batch_size,
            self.config.discovery_progress_every,
        );
        let mut aggregator = Aggregator::new();

        info!("Starting ICMP discovery on {total} potential hosts...");
        self.notify(Phase::Discovery, Progress { completed: 0, total });

        let stats = pool
            .run(
                targets,
                total,
                |target: Target| {
                    let prober = Arc::clone(&self.prober);
                    async move {
                        let liveness: Liveness = prober.probe_host(target.addr, timeout).await;
                        (target, liveness)
                    }
                },
                |(target, liveness): (Target, Liveness)| {
                    if verbose && liveness == Liveness::Up {
                        success!("Discovery: {target} is up");
                    }
                    aggregator.record_liveness(target, liveness);
                },
                |progress| self.notify(Phase::Discovery, progress),
            )
            .await;
        aggregator.record_dropped(stats.failed);

        let inconclusive: usize = aggregator.indeterminate_count();
        if inconclusive > 0 {
            warn!(
                "Discovery was inconclusive for {inconclusive} hosts. ICMP needs raw socket privileges."
            );
        }
        success!(
            "Discovery complete. Found {} active hosts.",
            aggregator.live_count()
        );
        aggregator
    }

    async fn scan_ports(&self, aggregator: &mut Aggregator, ports: &PortSpec) {
        let hosts: Vec<(usize, IpAddr)> = aggregator.live_hosts();
        let total: usize = hosts.len() * ports.len();
        if total == 0 {
            return;
        }

        let timeout = self.config.timeout;
        let verbose: bool = self.config.verbose;
        let pool = WorkerPool::new(
            self.config.workers,
            self.config.batch_size,
            self.config.port_progress_every,
        );

        info!("Proceeding to TCP scan on {} active host(s)...", hosts.len());
        info!("Total probes to execute: {total}");
        self.notify(Phase::PortScan, Progress { completed: 0, total });

        let port_list: &[u16] = ports.as_slice();
        let work = hosts
            .into_iter()
            .flat_map(move |(host, addr)| port_list.iter().map(move |&port| (host, addr, port)));

        let mut dropped: usize = 0;
        let stats = pool
            .run(
                work,
                total,
                |(host, addr, port): (usize, IpAddr, u16)| {
                    let prober = Arc::clone(&self.prober);
                    async move { (host, addr, prober.probe_port(addr, port, timeout).await) }
                },
                |(host, addr, outcome)| match outcome {
                    Ok(result) => {
                        if verbose && result.is_open() {
                            success!("Port Open: {}", describe_open_port(addr, &result));
                        }
                        aggregator.record_probe(host, result);
                    }
                    Err(e) => {
                        debug!("dropping probe: {e}");
                        dropped += 1;
                    }
                },
                |progress| self.notify(Phase::PortScan, progress),
            )
            .await;

        success!("TCP scan complete.");

        let lost: usize = dropped + stats.failed;
        if lost > 0 {
            warn!("{lost} probes were dropped after running out of local resources.");
        }
        aggregator.record_dropped(lost);
    }

    fn notify(&self, phase: Phase, progress: Progress) {
        if let Some(hook) = &self.on_progress {
            hook(phase, progress);
        }
    }
}

/// `ip:port (banner) [latency]`, the banner part only when there is one.
pub fn describe_open_port(addr: IpAddr, result: &ProbeResult) -> String {
    let endpoint = std::net::SocketAddr::new(addr, result.port);
    match &result.banner {
        Some(banner) => format!(
            "{endpoint} ({banner}) [{:.4}s]",
            result.latency.as_secs_f64()
        ),
        None => format!("{endpoint} [{:.4}s]", result.latency.as_secs_f64()),
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

//! Collects probe outcomes into a [`ScanReport`].
//!
//! Owned by a single consumer; every outcome passes through it in completion order.

use std::net::IpAddr;

use scanr_common::network::Target;
use scanr_common::report::{HostResult, Liveness, ProbeResult, ScanReport};
use scanr_common::warn;

#[derive(Debug, Default)]
pub struct Aggregator {
    hosts: Vec<HostResult>,
    skipped_count: usize,
    indeterminate_count: usize,
    dropped_count: usize,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every target is taken as up. Used when discovery is skipped.
    pub fn assume_up(targets: impl IntoIterator<Item = Target>) -> Self {
        Self {
            hosts: targets.into_iter().map(HostResult::up).collect(),
            ..Self::default()
        }
    }

    /// Down targets are skipped. Inconclusive ones are kept and scanned anyway.
    pub fn record_liveness(&mut self, target: Target, liveness: Liveness) {
        match liveness {
            Liveness::Up => self.hosts.push(HostResult::up(target)),
            Liveness::Down => self.skipped_count += 1,
            Liveness::Indeterminate => {
                warn!("Could not check whether {target} is up, scanning it anyway.");
                self.indeterminate_count += 1;
                self.hosts.push(HostResult::up(target));
            }
        }
    }

    pub fn record_probe(&mut self, host: usize, result: ProbeResult) {
        if let Some(entry) = self.hosts.get_mut(host) {
            entry.record(result);
        }
    }

    pub fn record_dropped(&mut self, count: usize) {
        self.dropped_count += count;
    }

    /// Hosts to port scan, keyed by the index [`Aggregator::record_probe`] expects.
    pub fn live_hosts(&self) -> Vec<(usize, IpAddr)> {
        self.hosts
            .iter()
            .enumerate()
            .map(|(idx, host)| (idx, host.target().addr))
            .collect()
    }

    pub fn live_count(&self) -> usize {
        self.hosts.len()
    }

    pub fn indeterminate_count(&self) -> usize {
        self.indeterminate_count
    }

    pub fn finish(self) -> ScanReport {
        ScanReport::new(
            self.hosts,
            self.skipped_count,
            self.indeterminate_count,
            self.dropped_count,
        )
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

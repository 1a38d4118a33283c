//! # Scan Results
//!
//! Records produced by a scan, from a single port probe up to the final report.
//! Serialized field names (`target`, `state`, `open_ports`, `port`, `banner`, `latency`,
//! `skipped_count`) are stable and consumed by the output formatters.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::network::Target;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PortState {
    Open,
    /// Refused, timed out and unreachable all land here.
    Closed,
}

impl fmt::Display for PortState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => f.write_str("open"),
            Self::Closed => f.write_str("closed"),
        }
    }
}

/// Outcome of a single TCP probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeResult {
    pub port: u16,
    pub state: PortState,
    pub banner: Option<String>,
    #[serde(with = "latency_serde")]
    pub latency: Duration,
}

impl ProbeResult {
    pub fn open(port: u16, latency: Duration, banner: Option<String>) -> Self {
        Self {
            port,
            state: PortState::Open,
            banner,
            latency,
        }
    }

    pub fn closed(port: u16, latency: Duration) -> Self {
        Self {
            port,
            state: PortState::Closed,
            banner: None,
            latency,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state == PortState::Open
    }
}

/// Outcome of an ICMP echo probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    Up,
    Down,
    /// Discovery could not run, e.g. raw sockets are not permitted.
    Indeterminate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HostState {
    Up,
    Down,
}

impl fmt::Display for HostState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => f.write_str("up"),
            Self::Down => f.write_str("down"),
        }
    }
}

/// Everything known about one target.
///
/// Only open ports are kept. Ports are put in ascending order by [`HostResult::finish`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostResult {
    target: Target,
    state: HostState,
    open_ports: Vec<ProbeResult>,
}

impl HostResult {
    pub fn new(target: Target, state: HostState) -> Self {
        Self {
            target,
            state,
            open_ports: Vec::new(),
        }
    }

    pub fn up(target: Target) -> Self {
        Self::new(target, HostState::Up)
    }

    /// Appends a probe result. Closed results are ignored.
    pub fn record(&mut self, result: ProbeResult) {
        if result.is_open() {
            self.open_ports.push(result);
        }
    }

    pub fn finish(mut self) -> Self {
        self.open_ports.sort_by_key(|result| result.port);
        self
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn state(&self) -> HostState {
        self.state
    }

    pub fn is_up(&self) -> bool {
        self.state == HostState::Up
    }

    pub fn open_ports(&self) -> &[ProbeResult] {
        &self.open_ports
    }
}

/// The single artifact of a scan. Built once, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    active_hosts: Vec<HostResult>,
    skipped_count: usize,
    indeterminate_count: usize,
    dropped_count: usize,
}

impl ScanReport {
    /// Keeps hosts that are up, orders their ports, and orders the hosts by address.
    pub fn new(
        hosts: impl IntoIterator<Item = HostResult>,
        skipped_count: usize,
        indeterminate_count: usize,
        dropped_count: usize,
    ) -> Self {
        let mut active_hosts: Vec<HostResult> = hosts
            .into_iter()
            .filter(HostResult::is_up)
            .map(HostResult::finish)
            .collect();
        active_hosts.sort_by(|a, b| a.target.cmp(&b.target));

        Self {
            active_hosts,
            skipped_count,
            indeterminate_count,
            dropped_count,
        }
    }

    pub fn active_hosts(&self) -> &[HostResult] {
        &self.active_hosts
    }

    /// Targets that discovery found to be down.
    pub fn skipped_count(&self) -> usize {
        self.skipped_count
    }

    /// Targets whose discovery was inconclusive and were scanned anyway.
    pub fn indeterminate_count(&self) -> usize {
        self.indeterminate_count
    }

    /// Work items lost to resource errors, counted neither open nor closed.
    pub fn dropped_count(&self) -> usize {
        self.dropped_count
    }
}

/// Latency is written as fractional seconds.
mod latency_serde {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(duration.as_secs_f64())
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

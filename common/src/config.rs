use std::time::Duration;

/// Default port specification used when none is given.
pub const DEFAULT_PORTS: &str = "1-1024";

/// Targets above this count are probed for liveness before port scanning (auto method).
pub const DISCOVERY_THRESHOLD: usize = 5;

/// Work items submitted to the worker pool at once.
pub const DEFAULT_BATCH_SIZE: usize = 20_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanMethod {
    /// Port scan every target, no discovery.
    Tcp,
    /// Discovery only, no port scan.
    Icmp,
    /// Discovery when there are more than [`DISCOVERY_THRESHOLD`] targets, then port scan.
    #[default]
    Auto,
}

#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub method: ScanMethod,
    /// Deadline for each connect attempt and each ICMP echo.
    pub timeout: Duration,
    /// Upper bound on probes in flight.
    pub workers: usize,
    pub batch_size: usize,
    pub port_progress_every: usize,
    pub discovery_progress_every: usize,
    pub discovery_threshold: usize,
    /// Log every live host and open port as it is found.
    pub verbose: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            method: ScanMethod::Auto,
            timeout: Duration::from_secs(1),
            workers: 100,
            batch_size: DEFAULT_BATCH_SIZE,
            port_progress_every: 100,
            discovery_progress_every: 10,
            discovery_threshold: DISCOVERY_THRESHOLD,
            verbose: false,
        }
    }
}

impl ScanConfig {
    pub fn should_discover(&self, target_count: usize) -> bool {
        match self.method {
            ScanMethod::Icmp => true,
            ScanMethod::Tcp => false,
            ScanMethod::Auto => target_count > self.discovery_threshold,
        }
    }

    pub fn should_scan_ports(&self) -> bool {
        self.method != ScanMethod::Icmp
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

#![cfg(test)]
use async_trait::async_trait;
use scanr_common::config::{ScanConfig, ScanMethod};
use scanr_common::network::{PortSpec, target};
use scanr_common::report::{Liveness, ProbeResult};
use scanr_core::{ProbeError, Prober, Scanner};
use std::fmt;
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// Behaves as if every socket the process tries to open is refused.
struct NoSockets;

#[async_trait]
impl Prober for NoSockets {
    async fn probe_host(&self, _addr: IpAddr, _timeout: Duration) -> Liveness {
        Liveness::Indeterminate
    }

    async fn probe_port(
        &self,
        addr: IpAddr,
        port: u16,
        _timeout: Duration,
    ) -> Result<ProbeResult, ProbeError> {
        Err(ProbeError::Resource {
            addr: SocketAddr::new(addr, port),
            source: io::Error::from_raw_os_error(24),
        })
    }
}

/// Every host is down: nothing answers within the timeout.
struct Silent;

#[async_trait]
impl Prober for Silent {
    async fn probe_host(&self, _addr: IpAddr, timeout: Duration) -> Liveness {
        tokio::time::sleep(timeout).await;
        Liveness::Down
    }

    async fn probe_port(
        &self,
        _addr: IpAddr,
        port: u16,
        _timeout: Duration,
    ) -> Result<ProbeResult, ProbeError> {
        panic!("port {port} scanned on a host that never came up");
    }
}

/// Answers after a delay that shrinks as the address grows, so completions arrive in
/// reverse address order.
struct ReverseLatency;

#[async_trait]
impl Prober for ReverseLatency {
    async fn probe_host(&self, _addr: IpAddr, _timeout: Duration) -> Liveness {
        Liveness::Up
    }

    async fn probe_port(
        &self,
        addr: IpAddr,
        port: u16,
        _timeout: Duration,
    ) -> Result<ProbeResult, ProbeError> {
        let last = match addr {
            IpAddr::V4(v4) => v4.octets()[3],
            IpAddr::V6(_) => 0,
        };
        tokio::time::sleep(Duration::from_millis(u64::from(20 - last.min(20)))).await;
        Ok(ProbeResult::open(port, Duration::ZERO, None))
    }
}

/// Panics on one port.
struct Flaky;

#[async_trait]
impl Prober for Flaky {
    async fn probe_host(&self, _addr: IpAddr, _timeout: Duration) -> Liveness {
        Liveness::Up
    }

    async fn probe_port(
        &self,
        _addr: IpAddr,
        port: u16,
        _timeout: Duration,
    ) -> Result<ProbeResult, ProbeError> {
        if port == 13 {
            panic!("probe blew up");
        }
        Ok(ProbeResult::closed(port, Duration::ZERO))
    }
}

/// Records `(target, message)` of every event emitted while installed.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<(String, String)>>>);

impl Captured {
    fn messages(&self, target: &str) -> Vec<String> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|(t, _)| t == target)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

impl<S: Subscriber> Layer<S> for Captured {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        self.0
            .lock()
            .unwrap()
            .push((event.metadata().target().to_string(), visitor.0));
    }
}

struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

fn config(method: ScanMethod) -> ScanConfig {
    ScanConfig {
        method,
        timeout: Duration::from_millis(100),
        workers: 4,
        ..ScanConfig::default()
    }
}

#[tokio::test]
async fn refused_sockets_degrade_without_hanging() {
    let targets = target::expand_all(&["10.20.0.0/29"]).unwrap();
    assert_eq!(targets.len(), 6);
    let ports: PortSpec = "22,80,443".parse().unwrap();

    let start = Instant::now();
    let report = Scanner::with_prober(Arc::new(NoSockets), config(ScanMethod::Auto))
        .run(targets, &ports)
        .await;

    assert!(start.elapsed() < Duration::from_secs(5));
    assert_eq!(report.indeterminate_count(), 6);
    assert_eq!(report.skipped_count(), 0);
    assert_eq!(report.active_hosts().len(), 6);
    assert_eq!(report.dropped_count(), 18);
    assert!(report.active_hosts().iter().all(|h| h.open_ports().is_empty()));
}

#[tokio::test]
async fn host_order_ignores_completion_order() {
    let targets = target::expand_all(&["10.30.0.0/28"]).unwrap();
    let ports: PortSpec = "80".parse().unwrap();

    let report = Scanner::with_prober(Arc::new(ReverseLatency), config(ScanMethod::Tcp))
        .run(targets, &ports)
        .await;

    let lasts: Vec<u8> = report
        .active_hosts()
        .iter()
        .map(|h| match h.target().addr {
            IpAddr::V4(v4) => v4.octets()[3],
            IpAddr::V6(_) => 0,
        })
        .collect();
    assert_eq!(lasts, (1..=14).collect::<Vec<u8>>());
    assert!(report.active_hosts().iter().all(|h| h.open_ports().len() == 1));
}

#[tokio::test]
async fn panicking_probe_is_dropped_not_fatal() {
    let targets = target::expand_all(&["10.40.0.1", "10.40.0.2"]).unwrap();
    let ports: PortSpec = "10-15".parse().unwrap();

    let report = Scanner::with_prober(Arc::new(Flaky), config(ScanMethod::Tcp))
        .run(targets, &ports)
        .await;

    assert_eq!(report.active_hosts().len(), 2);
    assert_eq!(report.dropped_count(), 2);
}

#[tokio::test]
async fn refused_sockets_are_reported_as_warnings() {
    let captured = Captured::default();
    let _guard = tracing::subscriber::set_default(tracing_subscriber::registry().with(captured.clone()));

    let targets = target::expand_all(&["10.20.1.0/29"]).unwrap();
    let ports: PortSpec = "22,80".parse().unwrap();
    let report = Scanner::with_prober(Arc::new(NoSockets), config(ScanMethod::Auto))
        .run(targets, &ports)
        .await;
    assert_eq!(report.indeterminate_count(), 6);

    let warnings = captured.messages("scanr::warn");
    for host in ["10.20.1.1", "10.20.1.6"] {
        assert!(
            warnings.iter().any(|w| w.contains(host) && w.contains("scanning it anyway")),
            "no warning for {host} in {warnings:?}"
        );
    }
    assert!(warnings.iter().any(|w| w.contains("inconclusive for 6 hosts")));
    assert!(warnings.iter().any(|w| w.starts_with("12 probes were dropped")));
}

#[tokio::test]
async fn silent_hosts_are_skipped_within_the_timeout() {
    let targets = target::expand_all(&["10.50.0.1", "10.50.0.2", "10.50.0.3"]).unwrap();
    let ports: PortSpec = "80".parse().unwrap();

    let start = Instant::now();
    let report = Scanner::with_prober(Arc::new(Silent), config(ScanMethod::Icmp))
        .run(targets, &ports)
        .await;

    assert!(start.elapsed() < Duration::from_secs(2));
    assert_eq!(report.skipped_count(), 3);
    assert_eq!(report.indeterminate_count(), 0);
    assert!(report.active_hosts().is_empty());
}

#![cfg(test)]
use scanr_common::config::{ScanConfig, ScanMethod};
use scanr_common::network::{PortSpec, Target, target};
use scanr_common::report::ScanReport;
use scanr_core::Scanner;
use std::net::{IpAddr, Ipv4Addr};
use std::time::{Duration, Instant};
use tokio::net::TcpListener;

fn config(method: ScanMethod) -> ScanConfig {
    ScanConfig {
        method,
        timeout: Duration::from_millis(500),
        workers: 16,
        ..ScanConfig::default()
    }
}

/// A listener that accepts forever and greets every client.
async fn greeting_listener(greeting: &'static [u8]) -> u16 {
    use tokio::io::AsyncWriteExt;

    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else { break };
            tokio::spawn(async move {
                let _ = socket.write_all(greeting).await;
                tokio::time::sleep(Duration::from_millis(100)).await;
            });
        }
    });
    port
}

/// A port nothing listens on, as far as this process can tell.
async fn closed_port() -> u16 {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
    listener.local_addr().unwrap().port()
}

fn open_ports(report: &ScanReport) -> Vec<(String, u16)> {
    report
        .active_hosts()
        .iter()
        .flat_map(|host| {
            host.open_ports()
                .iter()
                .map(move |probe| (host.target().name.clone(), probe.port))
        })
        .collect()
}

/// Scanning loopback on the edge ports with discovery off finds the host and nothing else.
#[tokio::test]
async fn loopback_edge_ports_without_discovery() {
    let targets: Vec<Target> = target::expand_all(&["127.0.0.1"]).unwrap();
    let ports: PortSpec = "1,65535".parse().unwrap();

    let report = Scanner::new(config(ScanMethod::Tcp)).run(targets, &ports).await;

    assert_eq!(report.active_hosts().len(), 1);
    assert_eq!(report.active_hosts()[0].target().addr, IpAddr::V4(Ipv4Addr::LOCALHOST));
    assert!(report.active_hosts()[0].open_ports().is_empty());
    assert_eq!(report.skipped_count(), 0);
}

#[tokio::test]
async fn local_fixture_is_found_with_its_banner() {
    let open = greeting_listener(b"220 fixture ready\r\n").await;
    let closed = closed_port().await;
    let targets = target::expand_all(&["127.0.0.1"]).unwrap();
    let ports: PortSpec = format!("{open},{closed}").parse().unwrap();

    let report = Scanner::new(config(ScanMethod::Tcp)).run(targets, &ports).await;

    let host = &report.active_hosts()[0];
    assert_eq!(host.open_ports().len(), 1);
    assert_eq!(host.open_ports()[0].port, open);
    assert_eq!(host.open_ports()[0].banner.as_deref(), Some("220 fixture ready"));
}

#[tokio::test]
async fn repeated_scans_agree() {
    let open = greeting_listener(b"hello\n").await;
    let closed = closed_port().await;
    let ports: PortSpec = format!("{open},{closed}").parse().unwrap();

    let scanner = Scanner::new(config(ScanMethod::Tcp));
    let first = scanner
        .run(target::expand_all(&["127.0.0.1"]).unwrap(), &ports)
        .await;
    let second = scanner
        .run(target::expand_all(&["127.0.0.1"]).unwrap(), &ports)
        .await;

    assert_eq!(open_ports(&first), open_ports(&second));
    assert_eq!(open_ports(&first), vec![("127.0.0.1".to_string(), open)]);
}

#[tokio::test]
async fn several_loopback_addresses_come_back_in_numeric_order() {
    let targets = target::expand_all(&["127.0.0.10", "127.0.0.9", "127.0.0.100", "127.0.0.2"]).unwrap();
    let ports: PortSpec = closed_port().await.to_string().parse().unwrap();

    let report = Scanner::new(config(ScanMethod::Tcp)).run(targets, &ports).await;

    let names: Vec<&str> = report.active_hosts().iter().map(|h| h.target().name.as_str()).collect();
    assert_eq!(names, vec!["127.0.0.2", "127.0.0.9", "127.0.0.10", "127.0.0.100"]);
}

/// TEST-NET-1 normally never answers: discovery either skips it, or keeps it when raw
/// sockets are not available to this process. Some sandboxes route it to a live gateway.
#[tokio::test(flavor = "multi_thread")]
#[ignore]
async fn unreachable_host_is_skipped_or_inconclusive() {
    let targets = target::expand_all(&["192.0.2.1"]).unwrap();
    let ports: PortSpec = "80".parse().unwrap();
    let cfg = ScanConfig {
        timeout: Duration::from_millis(200),
        ..config(ScanMethod::Icmp)
    };

    let start = Instant::now();
    let report = Scanner::new(cfg).run(targets, &ports).await;
    assert!(start.elapsed() < Duration::from_secs(5));

    match report.indeterminate_count() {
        0 => {
            assert_eq!(report.skipped_count(), 1);
            assert!(report.active_hosts().is_empty());
        }
        1 => {
            assert_eq!(report.skipped_count(), 0);
            assert_eq!(report.active_hosts().len(), 1);
        }
        n => panic!("unexpected indeterminate count {n}"),
    }
}

//! Runs in its own test binary so no other test opens sockets while descriptors are counted.
#![cfg(target_os = "linux")]

use scanr_common::config::{ScanConfig, ScanMethod};
use scanr_common::network::{PortSpec, target};
use scanr_core::Scanner;
use std::net::Ipv4Addr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

fn open_descriptors() -> usize {
    std::fs::read_dir("/proc/self/fd").unwrap().count()
}

/// Serves every connection with `handler`, closing the socket when it returns.
async fn serve<F, Fut>(handler: F) -> u16
where
    F: Fn(TcpStream) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        loop {
            let Ok((socket, _)) = listener.accept().await else { break };
            tokio::spawn(handler(socket));
        }
    });
    port
}

/// Reads a request until the blank line that ends its headers, or EOF.
async fn read_request(socket: &mut TcpStream) {
    let mut request = Vec::new();
    let mut buffer = [0u8; 256];
    while !request.ends_with(b"\r\n\r\n") {
        match socket.read(&mut buffer).await {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&buffer[..n]),
        }
    }
}

#[tokio::test]
async fn loopback_scans_release_every_socket() {
    let greeting = serve(|mut socket| async move {
        let _ = socket.write_all(b"SSH-2.0-fixture\r\n").await;
    })
    .await;
    let answers_head = serve(|mut socket| async move {
        read_request(&mut socket).await;
        let _ = socket
            .write_all(b"HTTP/1.0 200 OK\r\nServer: fixture\r\n\r\n")
            .await;
    })
    .await;
    let ignores_head = serve(|mut socket| async move {
        read_request(&mut socket).await;
    })
    .await;
    let refused = {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        listener.local_addr().unwrap().port()
    };

    let ports: PortSpec = format!("{greeting},{answers_head},{ignores_head},{refused}")
        .parse()
        .unwrap();
    let config = ScanConfig {
        method: ScanMethod::Tcp,
        timeout: Duration::from_millis(500),
        workers: 8,
        ..ScanConfig::default()
    };
    let scanner = Scanner::new(config);

    // Warm-up run so lazily created runtime resources exist before counting.
    let targets = target::expand_all(&["127.0.0.1"]).unwrap();
    scanner.run(targets.clone(), &ports).await;
    tokio::time::sleep(Duration::from_millis(300)).await;

    let before = open_descriptors();
    for _ in 0..5 {
        let report = scanner.run(targets.clone(), &ports).await;
        assert_eq!(report.active_hosts()[0].open_ports().len(), 3);
        assert_eq!(report.dropped_count(), 0);
    }

    // Server-side handlers finish on their own once the client hangs up.
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(open_descriptors(), before);
}

//! TCP connect probe with banner grabbing.

use std::net::{IpAddr, SocketAddr};
use std::time::{Duration, Instant};

use scanr_common::report::ProbeResult;
use scanr_protocols::banner::{self, BANNER_READ_LEN, HTTP_HEAD_PROBE};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::trace;

use crate::error::{ProbeError, is_resource_exhaustion};

/// How long to wait for a service that speaks first before nudging it.
const PASSIVE_READ_TIMEOUT: Duration = Duration::from_millis(500);

/// Connects to `addr:port` and reports whether the port accepted the handshake.
///
/// Refusals, unreachable networks and timeouts all yield a closed result. Only local
/// resource exhaustion is an error. The socket is released on every path.
pub async fn probe_port(
    addr: IpAddr,
    port: u16,
    connect_timeout: Duration,
) -> Result<ProbeResult, ProbeError> {
    let socket_addr: SocketAddr = SocketAddr::new(addr, port);
    let start: Instant = Instant::now();

    let mut stream: TcpStream = match timeout(connect_timeout, TcpStream::connect(socket_addr)).await {
        Ok(Ok(stream)) => stream,
        Ok(Err(e)) if is_resource_exhaustion(&e) => {
            return Err(ProbeError::Resource {
                addr: socket_addr,
                source: e,
            });
        }
        Ok(Err(e)) => {
            trace!("{socket_addr} closed: {e}");
            return Ok(ProbeResult::closed(port, start.elapsed()));
        }
        Err(_elapsed) => return Ok(ProbeResult::closed(port, start.elapsed())),
    };
    let latency: Duration = start.elapsed();

    let banner: Option<String> = grab_banner(&mut stream, connect_timeout).await;
    Ok(ProbeResult::open(port, latency, banner))
}

/// Reads whatever the service volunteers. Silent services get an HTTP `HEAD` and one
/// more read.
async fn grab_banner(stream: &mut TcpStream, read_timeout: Duration) -> Option<String> {
    let mut buffer = [0u8; BANNER_READ_LEN];

    match timeout(PASSIVE_READ_TIMEOUT, stream.read(&mut buffer)).await {
        Ok(Ok(0)) => return None,
        Ok(Ok(n)) => return banner::extract(&buffer[..n]),
        Ok(Err(_)) | Err(_) => {}
    }

    match timeout(read_timeout, stream.write_all(HTTP_HEAD_PROBE)).await {
        Ok(Ok(())) => {}
        _ => return None,
    }

    match timeout(read_timeout, stream.read(&mut buffer)).await {
        Ok(Ok(n)) if n > 0 => banner::extract(&buffer[..n]),
        _ => None,
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

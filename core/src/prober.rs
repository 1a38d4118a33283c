//! The seam between scan orchestration and the network.
//!
//! The scanner only ever talks to a [`Prober`]. [`NetProber`] is the real thing; tests
//! substitute their own to inject failures.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use scanr_common::report::{Liveness, ProbeResult};
use tokio::task;
use tracing::debug;

use crate::error::ProbeError;
use crate::network::{icmp, tcp};

#[async_trait]
pub trait Prober: Send + Sync {
    /// Is anything answering at `addr`? Must return within roughly `timeout`.
    async fn probe_host(&self, addr: IpAddr, timeout: Duration) -> Liveness;

    /// Is `port` open on `addr`? Closed covers every remote failure.
    async fn probe_port(
        &self,
        addr: IpAddr,
        port: u16,
        timeout: Duration,
    ) -> Result<ProbeResult, ProbeError>;
}

/// ICMP echo for discovery, TCP connect for ports.
#[derive(Debug, Default, Clone, Copy)]
pub struct NetProber;

#[async_trait]
impl Prober for NetProber {
    async fn probe_host(&self, addr: IpAddr, timeout: Duration) -> Liveness {
        match task::spawn_blocking(move || icmp::probe_host(addr, timeout)).await {
            Ok(liveness) => liveness,
            Err(e) => {
                debug!("ICMP probe task for {addr} failed: {e}");
                Liveness::Down
            }
        }
    }

    async fn probe_port(
        &self,
        addr: IpAddr,
        port: u16,
        timeout: Duration,
    ) -> Result<ProbeResult, ProbeError> {
        tcp::probe_port(addr, port, timeout).await
    }
}

//! ICMP echo liveness probe over a raw socket.
//!
//! Each probe opens its own raw channel, sends one echo request and waits for a matching
//! reply until the deadline. Blocking; callers run it on a blocking thread.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::io;
use std::net::IpAddr;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::Context;
use pnet::packet::Packet;
use pnet::packet::icmp::IcmpPacket;
use pnet::packet::ip::IpNextHeaderProtocols;
use pnet::transport::{
    self, TransportChannelType, TransportProtocol, TransportReceiver, TransportSender,
};
use scanr_common::report::Liveness;
use scanr_protocols::icmp;
use tracing::debug;

const TRANSPORT_BUFFER_SIZE: usize = 4096;
const CHANNEL_TYPE_ICMP: TransportChannelType =
    TransportChannelType::Layer4(TransportProtocol::Ipv4(IpNextHeaderProtocols::Icmp));
const ECHO_SEQUENCE: u16 = 1;

/// Sends one echo request to `addr` and waits up to `timeout` for the reply.
///
/// [`Liveness::Indeterminate`] when raw sockets are not permitted or the address family
/// is not supported. Any other local failure reads as [`Liveness::Down`].
pub fn probe_host(addr: IpAddr, timeout: Duration) -> Liveness {
    if addr.is_ipv6() {
        debug!("ICMP discovery is IPv4 only, cannot check {addr}");
        return Liveness::Indeterminate;
    }

    let (mut tx, mut rx) = match transport::transport_channel(TRANSPORT_BUFFER_SIZE, CHANNEL_TYPE_ICMP) {
        Ok(channel) => channel,
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            debug!("raw socket refused for {addr}: {e}");
            return Liveness::Indeterminate;
        }
        Err(e) => {
            debug!("could not open ICMP channel for {addr}: {e}");
            return Liveness::Down;
        }
    };

    match echo(&mut tx, &mut rx, addr, worker_identifier(), timeout) {
        Ok(true) => Liveness::Up,
        Ok(false) => Liveness::Down,
        Err(e) => {
            debug!("echo to {addr} failed: {e:#}");
            Liveness::Down
        }
    }
}

fn echo(
    tx: &mut TransportSender,
    rx: &mut TransportReceiver,
    addr: IpAddr,
    identifier: u16,
    timeout: Duration,
) -> anyhow::Result<bool> {
    let request: Vec<u8> = icmp::create_echo_request(identifier, ECHO_SEQUENCE)?;
    let packet: IcmpPacket = IcmpPacket::new(&request).context("wrapping echo request")?;
    tx.send_to(packet, addr).context("sending echo request")?;

    let deadline: Instant = Instant::now() + timeout;
    let mut replies = transport::icmp_packet_iter(rx);
    loop {
        let remaining: Duration = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Ok(false);
        }

        let Some((reply, source)) = replies.next_with_timeout(remaining)? else {
            return Ok(false);
        };
        if source != addr {
            continue;
        }
        if answers_request(reply.packet(), identifier) {
            return Ok(true);
        }
    }
}

/// Whether `packet` is the echo reply to our own request. Other workers share the wire.
fn answers_request(packet: &[u8], identifier: u16) -> bool {
    matches!(
        icmp::parse_echo_reply(packet),
        Some(parsed) if parsed.identifier == identifier && parsed.sequence == ECHO_SEQUENCE
    )
}

/// Echo identifier for the calling thread, salted per process.
fn worker_identifier() -> u16 {
    static SALT: OnceLock<u64> = OnceLock::new();
    let salt: u64 = *SALT.get_or_init(rand::random::<u64>);

    let mut hasher = DefaultHasher::new();
    std::thread::current().id().hash(&mut hasher);
    salt.hash(&mut hasher);
    hasher.finish() as u16
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

//! ICMPv4 echo packets.
//!
//! Requests are 16 bytes: the 8 byte echo header followed by the send time as a
//! big-endian `f64` of seconds since the Unix epoch.

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use pnet::packet::icmp::echo_reply::EchoReplyPacket;
use pnet::packet::icmp::echo_request::{IcmpCodes, MutableEchoRequestPacket};
use pnet::packet::icmp::IcmpTypes;

pub const ICMP_HDR_LEN: usize = 8;
pub const TIMESTAMP_LEN: usize = 8;
pub const ECHO_REQUEST_LEN: usize = ICMP_HDR_LEN + TIMESTAMP_LEN;

const CHECKSUM_OFFSET: usize = 2;

/// The fields of an echo reply needed to match it to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EchoReply {
    pub identifier: u16,
    pub sequence: u16,
}

/// Builds an echo request stamped with the current time.
pub fn create_echo_request(identifier: u16, sequence: u16) -> anyhow::Result<Vec<u8>> {
    let timestamp: f64 = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs_f64())
        .unwrap_or_default();
    create_echo_request_at(identifier, sequence, timestamp)
}

/// Builds an echo request carrying the given timestamp.
pub fn create_echo_request_at(
    identifier: u16,
    sequence: u16,
    timestamp: f64,
) -> anyhow::Result<Vec<u8>> {
    let mut buffer: Vec<u8> = vec![0u8; ECHO_REQUEST_LEN];
    {
        let mut echo: MutableEchoRequestPacket =
            MutableEchoRequestPacket::new(&mut buffer).context("creating echo request")?;
        echo.set_icmp_type(IcmpTypes::EchoRequest);
        echo.set_icmp_code(IcmpCodes::NoCode);
        echo.set_checksum(0);
        echo.set_identifier(identifier);
        echo.set_sequence_number(sequence);
        echo.set_payload(&timestamp.to_be_bytes());
    }

    insert_checksum(&mut buffer);
    Ok(buffer)
}

/// Zeroes the checksum field, recomputes it over the whole buffer and writes it back.
pub fn insert_checksum(buffer: &mut [u8]) {
    if buffer.len() < CHECKSUM_OFFSET + 2 {
        return;
    }
    buffer[CHECKSUM_OFFSET..CHECKSUM_OFFSET + 2].fill(0);
    let csm: u16 = checksum(buffer);
    buffer[CHECKSUM_OFFSET..CHECKSUM_OFFSET + 2].copy_from_slice(&csm.to_be_bytes());
}

/// Internet checksum (RFC 1071): one's complement of the one's complement sum of all
/// 16-bit big-endian words. Odd input is summed as if padded with a zero byte.
pub fn checksum(data: &[u8]) -> u16 {
    !ones_complement_sum(data)
}

/// True when the buffer's embedded checksum is consistent with its contents.
pub fn is_valid(data: &[u8]) -> bool {
    checksum(data) == 0
}

fn ones_complement_sum(data: &[u8]) -> u16 {
    let mut chunks = data.chunks_exact(2);
    let mut sum: u64 = chunks
        .by_ref()
        .map(|word| u64::from(u16::from_be_bytes([word[0], word[1]])))
        .sum();

    if let [last] = chunks.remainder() {
        sum += u64::from(u16::from_be_bytes([*last, 0]));
    }

    while sum >> 16 != 0 {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }
    sum as u16
}

/// Reads an ICMP message (IP header already stripped) as an echo reply.
///
/// Returns `None` for anything that is not a well-formed echo reply.
pub fn parse_echo_reply(bytes: &[u8]) -> Option<EchoReply> {
    let reply: EchoReplyPacket = EchoReplyPacket::new(bytes)?;
    if reply.get_icmp_type() != IcmpTypes::EchoReply {
        return None;
    }
    Some(EchoReply {
        identifier: reply.get_identifier(),
        sequence: reply.get_sequence_number(),
    })
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

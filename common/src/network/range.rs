//! # Address Range Model
//!
//! Continuous, inclusive ranges of IPv4 and IPv6 addresses, used to expand CIDR
//! blocks like `192.168.1.0/24` or `fe80::/120` into the hosts they contain.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use pnet::ipnetwork::{Ipv4Network, Ipv6Network};

/// Represents a continuous range of IPv4 addresses, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv4Range {
    pub start_addr: Ipv4Addr,
    pub end_addr: Ipv4Addr,
}

impl Ipv4Range {
    pub fn new(start_addr: Ipv4Addr, end_addr: Ipv4Addr) -> Self {
        Self {
            start_addr,
            end_addr,
        }
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Ipv4Addr> + Clone + use<> {
        let start: u32 = u32::from(self.start_addr);
        let end: u32 = u32::from(self.end_addr);
        (start..=end).map(Ipv4Addr::from)
    }

    pub fn to_iter(&self) -> impl Iterator<Item = IpAddr> + use<> {
        self.iter().map(IpAddr::V4)
    }

    pub fn len(&self) -> usize {
        let start: u32 = u32::from(self.start_addr);
        let end: u32 = u32::from(self.end_addr);
        if start > end {
            0
        } else {
            (end - start) as usize + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Creates a range from an IP and a CIDR prefix (e.g., 192.168.1.0/24).
///
/// Returns the range covering the entire network block.
pub fn cidr_range(ip: Ipv4Addr, prefix: u8) -> anyhow::Result<Ipv4Range> {
    let network = Ipv4Network::new(ip, prefix)?;
    Ok(Ipv4Range::new(network.network(), network.broadcast()))
}

/// Creates the range of usable host addresses of a CIDR block.
///
/// Network and broadcast addresses are excluded when the block has room for them
/// (prefix 30 and below). A /31 keeps both addresses and a /32 is the address itself.
pub fn host_range(ip: Ipv4Addr, prefix: u8) -> anyhow::Result<Ipv4Range> {
    let block: Ipv4Range = cidr_range(ip, prefix)?;
    if prefix >= 31 {
        return Ok(block);
    }

    let start: u32 = u32::from(block.start_addr).saturating_add(1);
    let end: u32 = u32::from(block.end_addr).saturating_sub(1);
    Ok(Ipv4Range::new(Ipv4Addr::from(start), Ipv4Addr::from(end)))
}

/// Represents a continuous range of IPv6 addresses, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv6Range {
    pub start_addr: Ipv6Addr,
    pub end_addr: Ipv6Addr,
}

impl Ipv6Range {
    pub fn new(start_addr: Ipv6Addr, end_addr: Ipv6Addr) -> Self {
        Self {
            start_addr,
            end_addr,
        }
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Ipv6Addr> + Clone + use<> {
        let start: u128 = u128::from(self.start_addr);
        let end: u128 = u128::from(self.end_addr);
        (start..=end).map(Ipv6Addr::from)
    }

    pub fn to_iter(&self) -> impl Iterator<Item = IpAddr> + use<> {
        self.iter().map(IpAddr::V6)
    }

    /// Number of addresses, saturating at `u128::MAX` for the full space.
    pub fn len(&self) -> u128 {
        let start: u128 = u128::from(self.start_addr);
        let end: u128 = u128::from(self.end_addr);
        if start > end {
            0
        } else {
            (end - start).saturating_add(1)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Creates the range of usable host addresses of an IPv6 block.
///
/// IPv6 has no broadcast address. Only the subnet-router anycast address (the
/// first one) is skipped, and only below /127.
pub fn ipv6_host_range(ip: Ipv6Addr, prefix: u8) -> anyhow::Result<Ipv6Range> {
    let network = Ipv6Network::new(ip, prefix)?;
    let start: u128 = u128::from(network.network());
    let host_bits: u32 = 128 - u32::from(prefix);
    let mask: u128 = u128::MAX.checked_shr(128 - host_bits).unwrap_or(0);
    let end: u128 = start | mask;

    if prefix >= 127 {
        return Ok(Ipv6Range::new(Ipv6Addr::from(start), Ipv6Addr::from(end)));
    }
    Ok(Ipv6Range::new(Ipv6Addr::from(start + 1), Ipv6Addr::from(end)))
}

/// The usable hosts of a parsed CIDR block, of either family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostBlock {
    V4(Ipv4Range),
    V6(Ipv6Range),
}

impl HostBlock {
    pub fn len(&self) -> u128 {
        match self {
            HostBlock::V4(range) => range.len() as u128,
            HostBlock::V6(range) => range.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_iter(&self) -> Box<dyn Iterator<Item = IpAddr>> {
        match *self {
            HostBlock::V4(range) => Box::new(range.to_iter()),
            HostBlock::V6(range) => Box::new(range.to_iter()),
        }
    }
}

/// Parses CIDR notation like "192.168.1.0/24" or "fe80::/126" into its usable hosts.
pub fn parse_cidr(s: &str) -> anyhow::Result<HostBlock> {
    let Some((ip_str, prefix_str)) = s.split_once('/') else {
        anyhow::bail!("missing '/' in CIDR '{s}'");
    };

    let ip: IpAddr = ip_str
        .trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid IP in CIDR '{ip_str}': {e}"))?;

    let prefix: u8 = prefix_str
        .trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid prefix in CIDR '{prefix_str}': {e}"))?;

    match ip {
        IpAddr::V4(v4) => Ok(HostBlock::V4(host_range(v4, prefix)?)),
        IpAddr::V6(v6) => Ok(HostBlock::V6(ipv6_host_range(v6, prefix)?)),
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

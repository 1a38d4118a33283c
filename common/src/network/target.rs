//! # Scan Target Model
//!
//! Turns target literals into concrete hosts to probe.
//!
//! A literal can be:
//! * A single IP address (e.g., `192.168.1.5`, `::1`).
//! * A hostname, resolved once up front.
//! * An IPv4 CIDR block (e.g., `192.168.1.0/24`), expanded into its usable hosts.
//!
//! A literal that looks like a CIDR block but does not parse as one is treated as a
//! single literal target instead of failing the whole run.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::net::{IpAddr, ToSocketAddrs};

use rayon::prelude::*;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::error::InputError;
use crate::network::range;

/// A single host to probe: the name it was given as and the address it resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target {
    pub name: String,
    pub addr: IpAddr,
}

impl Target {
    pub fn new(name: impl Into<String>, addr: IpAddr) -> Self {
        Self {
            name: name.into(),
            addr,
        }
    }
}

impl From<IpAddr> for Target {
    fn from(addr: IpAddr) -> Self {
        Self::new(addr.to_string(), addr)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Ordered by numeric address value, then by name.
impl Ord for Target {
    fn cmp(&self, other: &Self) -> Ordering {
        self.addr
            .cmp(&other.addr)
            .then_with(|| self.name.cmp(&other.name))
    }
}

impl PartialOrd for Target {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Serialize for Target {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.name)
    }
}

/// Largest number of hosts a single CIDR block may expand to (a /8 or a /104).
pub const MAX_BLOCK_HOSTS: u128 = 1 << 24;

/// Expands a single literal into the targets it denotes.
pub fn expand(literal: &str) -> Result<Vec<Target>, InputError> {
    let literal: &str = literal.trim();

    if literal.contains('/') {
        match range::parse_cidr(literal) {
            Ok(block) if block.len() > MAX_BLOCK_HOSTS => {
                return Err(InputError::BlockTooLarge {
                    block: literal.to_string(),
                    hosts: block.len(),
                    limit: MAX_BLOCK_HOSTS,
                });
            }
            Ok(block) => return Ok(block.to_iter().map(Target::from).collect()),
            Err(e) => debug!("'{literal}' is not a CIDR block ({e}), using it as a single target"),
        }
    }

    resolve(literal).map(|target| vec![target])
}

/// Expands every literal concurrently and merges the results.
///
/// Duplicate addresses are dropped, keeping the first name seen. No ordering is
/// guaranteed; callers sort where it matters.
pub fn expand_all<S>(literals: &[S]) -> Result<Vec<Target>, InputError>
where
    S: AsRef<str> + Sync,
{
    if literals.is_empty() {
        return Err(InputError::NoTargets);
    }

    let expanded: Vec<Vec<Target>> = literals
        .par_iter()
        .map(|literal| expand(literal.as_ref()))
        .collect::<Result<_, _>>()?;

    let mut seen: HashSet<IpAddr> = HashSet::new();
    let targets: Vec<Target> = expanded
        .into_iter()
        .flatten()
        .filter(|target| seen.insert(target.addr))
        .collect();

    Ok(targets)
}

/// Resolves an address literal or a hostname.
fn resolve(literal: &str) -> Result<Target, InputError> {
    if let Ok(addr) = literal.parse::<IpAddr>() {
        return Ok(Target::new(literal, addr));
    }

    if !is_hostname(literal) {
        return Err(InputError::InvalidTarget(literal.to_string()));
    }

    let addrs: Vec<IpAddr> = (literal, 0)
        .to_socket_addrs()
        .map_err(|source| InputError::Unresolvable {
            target: literal.to_string(),
            source,
        })?
        .map(|socket_addr| socket_addr.ip())
        .collect();

    addrs
        .iter()
        .find(|addr| addr.is_ipv4())
        .or_else(|| addrs.first())
        .map(|addr| Target::new(literal, *addr))
        .ok_or_else(|| InputError::InvalidTarget(literal.to_string()))
}

/// Syntactic check so obviously broken literals never reach the resolver.
/// A single trailing dot (FQDN) and underscores are accepted; the resolver
/// has the final say.
fn is_hostname(s: &str) -> bool {
    let name: &str = s.strip_suffix('.').unwrap_or(s);
    !name.is_empty()
        && name.len() <= 253
        && name.split('.').all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
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

//! Wire formats spoken by the probes.

pub mod banner;
pub mod icmp;

//! Port specifications: `"22,80,443"`, `"1-1024"`, or any mix such as `"80,20-22"`.

use std::collections::BTreeSet;
use std::str::FromStr;

use crate::error::InputError;

const MIN_PORT: u64 = 1;
const MAX_PORT: u64 = 65_535;

/// A non-empty, ascending, duplicate-free set of ports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortSpec(Vec<u16>);

impl PortSpec {
    pub fn as_slice(&self) -> &[u16] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for PortSpec {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(InputError::EmptyPortSpec);
        }

        let mut ports: BTreeSet<u16> = BTreeSet::new();
        for token in s.split(',').map(str::trim) {
            match token.split_once('-') {
                Some((start_str, end_str)) => {
                    let start: u16 = parse_port(start_str.trim(), token)?;
                    let end: u16 = parse_port(end_str.trim(), token)?;
                    if start > end {
                        return Err(InputError::ReversedRange(token.to_string()));
                    }
                    ports.extend(start..=end);
                }
                None => {
                    ports.insert(parse_port(token, token)?);
                }
            }
        }

        Ok(Self(ports.into_iter().collect()))
    }
}

fn parse_port(s: &str, token: &str) -> Result<u16, InputError> {
    if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
        return Err(InputError::InvalidPort(token.to_string()));
    }

    // Digits only, so the only parse failure left is overflow.
    let value: u64 = s.parse().unwrap_or(u64::MAX);
    if !(MIN_PORT..=MAX_PORT).contains(&value) {
        return Err(InputError::PortOutOfRange(value));
    }

    Ok(value as u16)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

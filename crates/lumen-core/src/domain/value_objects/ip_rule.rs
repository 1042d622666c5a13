//! IP allow-list rule value object.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use crate::{LumenError, LumenResult};
use thiserror::Error;

/// Error type for allow-list rule parsing.
#[derive(Debug, Error)]
#[error("Invalid IP rule: {0}")]
pub struct IpRuleError(String);

/// A single allow-list entry: a literal IPv4/IPv6 address or a CIDR block.
///
/// Rules are validated when parsed, so a grant never carries an entry that
/// cannot be evaluated. IPv4-mapped IPv6 addresses are canonicalized to
/// their IPv4 form on both the rule and the client side before comparison;
/// beyond that, address families never match each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum IpRule {
    /// An exact address match.
    Literal(IpAddr),
    /// A CIDR range match.
    Cidr {
        /// Network address of the block.
        network: IpAddr,
        /// Prefix length (≤32 for IPv4, ≤128 for IPv6).
        prefix: u8,
    },
}

impl IpRule {
    /// Parses a list of textual entries, as stored on a grant record.
    ///
    /// Fails with [`LumenError::Validation`] on the first entry that is
    /// neither a literal address nor a CIDR block; an unparseable entry is a
    /// creation/update error, not a silent no-op.
    pub fn parse_list(entries: &[String]) -> LumenResult<Vec<Self>> {
        entries
            .iter()
            .map(|entry| {
                entry
                    .parse::<Self>()
                    .map_err(|e| LumenError::validation(e.to_string()))
            })
            .collect()
    }

    /// Checks whether the given client address satisfies this rule.
    #[must_use]
    pub fn matches(&self, client: IpAddr) -> bool {
        let client = canonical(client);
        match *self {
            Self::Literal(addr) => canonical(addr) == client,
            Self::Cidr { network, prefix } => match (canonical(network), client) {
                (IpAddr::V4(net), IpAddr::V4(addr)) => {
                    v4_prefix_matches(net, addr, prefix)
                }
                (IpAddr::V6(net), IpAddr::V6(addr)) => {
                    v6_prefix_matches(net, addr, prefix)
                }
                _ => false,
            },
        }
    }
}

impl FromStr for IpRule {
    type Err = IpRuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some((addr_part, prefix_part)) = s.split_once('/') {
            let network: IpAddr = addr_part
                .parse()
                .map_err(|_| IpRuleError(s.to_string()))?;
            let prefix: u8 = prefix_part
                .parse()
                .map_err(|_| IpRuleError(s.to_string()))?;

            let max_prefix = match network {
                IpAddr::V4(_) => 32,
                IpAddr::V6(_) => 128,
            };
            if prefix > max_prefix {
                return Err(IpRuleError(s.to_string()));
            }

            Ok(Self::Cidr { network, prefix })
        } else {
            let addr: IpAddr = s.parse().map_err(|_| IpRuleError(s.to_string()))?;
            Ok(Self::Literal(addr))
        }
    }
}

impl fmt::Display for IpRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(addr) => write!(f, "{}", addr),
            Self::Cidr { network, prefix } => write!(f, "{}/{}", network, prefix),
        }
    }
}

impl TryFrom<String> for IpRule {
    type Error = IpRuleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<IpRule> for String {
    fn from(rule: IpRule) -> Self {
        rule.to_string()
    }
}

/// Canonicalizes IPv4-mapped IPv6 addresses (`::ffff:a.b.c.d`) to IPv4.
fn canonical(addr: IpAddr) -> IpAddr {
    match addr {
        IpAddr::V6(v6) => v6.to_ipv4_mapped().map_or(addr, IpAddr::V4),
        IpAddr::V4(_) => addr,
    }
}

fn v4_prefix_matches(network: Ipv4Addr, addr: Ipv4Addr, prefix: u8) -> bool {
    if prefix == 0 {
        return true;
    }
    let mask = u32::MAX << (32 - u32::from(prefix));
    (u32::from(network) & mask) == (u32::from(addr) & mask)
}

fn v6_prefix_matches(network: Ipv6Addr, addr: Ipv6Addr, prefix: u8) -> bool {
    if prefix == 0 {
        return true;
    }
    let mask = u128::MAX << (128 - u32::from(prefix));
    (u128::from(network) & mask) == (u128::from(addr) & mask)
}

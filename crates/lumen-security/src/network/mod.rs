//! Network allow-list matching.

use lumen_core::IpRule;
use std::net::IpAddr;
use tracing::debug;

/// Decides whether a client address satisfies a grant's allow-list.
///
/// An empty list means no restriction. A non-empty list matches if any
/// entry matches (logical OR). A client address that does not parse is
/// treated as non-matching: the failure is not attributable to
/// configuration, so it denies rather than erroring.
#[must_use]
pub fn matches(client_addr: &str, allow_list: &[IpRule]) -> bool {
    if allow_list.is_empty() {
        return true;
    }

    let Ok(client) = client_addr.trim().parse::<IpAddr>() else {
        debug!("Unparseable client address treated as non-matching: {}", client_addr);
        return false;
    };

    allow_list.iter().any(|rule| rule.matches(client))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(entries: &[&str]) -> Vec<IpRule> {
        entries.iter().map(|e| e.parse().unwrap()).collect()
    }

    #[test]
    fn test_empty_list_matches_any_address() {
        assert!(matches("203.0.113.7", &[]));
        assert!(matches("2001:db8::1", &[]));
        assert!(matches("garbage", &[]));
    }

    #[test]
    fn test_single_cidr() {
        let list = rules(&["10.0.0.0/24"]);
        assert!(matches("10.0.0.5", &list));
        assert!(!matches("10.0.1.5", &list));
    }

    #[test]
    fn test_any_entry_matches() {
        let list = rules(&["192.0.2.1", "10.0.0.0/8", "2001:db8::/32"]);
        assert!(matches("10.200.3.4", &list));
        assert!(matches("192.0.2.1", &list));
        assert!(matches("2001:db8::42", &list));
        assert!(!matches("198.51.100.1", &list));
    }

    #[test]
    fn test_malformed_client_address_denies() {
        let list = rules(&["10.0.0.0/8"]);
        assert!(!matches("not-an-address", &list));
        assert!(!matches("", &list));
        assert!(!matches("10.0.0.1/8", &list));
    }

    #[test]
    fn test_client_address_whitespace_is_tolerated() {
        let list = rules(&["10.0.0.0/8"]);
        assert!(matches(" 10.1.2.3 ", &list));
    }

    #[test]
    fn test_family_mismatch() {
        assert!(!matches("2001:db8::1", &rules(&["10.0.0.0/8"])));
        assert!(!matches("10.0.0.1", &rules(&["2001:db8::/32"])));
    }

    #[test]
    fn test_ipv4_mapped_ipv6_normalization() {
        let list = rules(&["10.0.0.0/24"]);
        assert!(matches("::ffff:10.0.0.9", &list));
    }
}

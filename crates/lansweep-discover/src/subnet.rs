//! Derives the /24 sweep range from a local address.
//!
//! The local subnet is assumed to be a /24 regardless of the interface's
//! real netmask.

use lansweep_core::NetworkPrefix;

use crate::error::{DiscoverError, Result};

/// Split a dotted-quad into octets and return its /24 network.
pub fn derive_subnet(addr: &str) -> Result<NetworkPrefix> {
    let malformed = || DiscoverError::MalformedAddress {
        addr: addr.to_string(),
    };

    let parts: Vec<&str> = addr.trim().split('.').collect();
    if parts.len() != 4 {
        return Err(malformed());
    }

    let mut octets = [0u8; 4];
    for (slot, part) in octets.iter_mut().zip(&parts) {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        *slot = part.parse().map_err(|_| malformed())?;
    }

    Ok(NetworkPrefix::from_octets(octets[0], octets[1], octets[2]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_subnet() {
        let prefix = derive_subnet("192.168.1.37").unwrap();
        assert_eq!(prefix.prefix(), "192.168.1");
        assert_eq!(prefix.cidr(), "192.168.1.0/24");

        let prefix = derive_subnet("10.0.0.1").unwrap();
        assert_eq!(prefix.cidr(), "10.0.0.0/24");
    }

    #[test]
    fn test_host_octet_is_ignored() {
        assert_eq!(
            derive_subnet("172.16.4.0").unwrap(),
            derive_subnet("172.16.4.255").unwrap()
        );
    }

    #[test]
    fn test_too_few_components() {
        for addr in ["192.168.1", "10.0", "", "localhost"] {
            assert!(
                matches!(derive_subnet(addr), Err(DiscoverError::MalformedAddress { .. })),
                "{addr} should be rejected"
            );
        }
    }

    #[test]
    fn test_too_many_or_non_numeric_components() {
        for addr in ["1.2.3.4.5", "192.168.one.1", "192.168..1", "192.168.1.-1", "+1.2.3.4"] {
            assert!(
                matches!(derive_subnet(addr), Err(DiscoverError::MalformedAddress { .. })),
                "{addr} should be rejected"
            );
        }
    }

    #[test]
    fn test_octet_out_of_range() {
        let err = derive_subnet("192.168.256.1").unwrap_err();
        assert_eq!(err.to_string(), "Malformed IPv4 address: 192.168.256.1");
    }
}

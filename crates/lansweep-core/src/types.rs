//! Core domain types for local subnet discovery.
//!
//! A sweep covers one `NetworkPrefix` and yields one `Device` for every
//! host that was confirmed live and enriched successfully.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use ipnet::Ipv4Net;
use serde::{Deserialize, Serialize};

// ── Device ────────────────────────────────────────────────────────

/// A live host discovered on the local subnet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub ipv4: Ipv4Addr,
    /// Only set when address resolution surfaced an IPv6 companion.
    pub ipv6: Option<Ipv6Addr>,
    /// Link-layer address. Only known when the host is the scanning
    /// machine itself, since remote MACs are not visible to address lookup.
    pub hardware_addr: Option<String>,
    /// Local egress address, used as a gateway hint.
    pub default_route: Option<Ipv4Addr>,
}

impl Device {
    pub fn new(ipv4: Ipv4Addr) -> Self {
        Self {
            ipv4,
            ipv6: None,
            hardware_addr: None,
            default_route: None,
        }
    }
}

// ── Network prefix ────────────────────────────────────────────────

/// A /24 network: the 256 addresses sharing the first three octets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Ipv4Net", into = "Ipv4Net")]
pub struct NetworkPrefix(Ipv4Net);

impl NetworkPrefix {
    pub const PREFIX_LEN: u8 = 24;

    pub fn from_octets(a: u8, b: u8, c: u8) -> Self {
        Self(Ipv4Net::new_assert(
            Ipv4Addr::new(a, b, c, 0),
            Self::PREFIX_LEN,
        ))
    }

    /// The /24 containing `addr`.
    pub fn containing(addr: Ipv4Addr) -> Self {
        let [a, b, c, _] = addr.octets();
        Self::from_octets(a, b, c)
    }

    /// The first three octets, e.g. `192.168.1`.
    pub fn prefix(&self) -> String {
        let [a, b, c, _] = self.0.network().octets();
        format!("{a}.{b}.{c}")
    }

    /// CIDR form, e.g. `192.168.1.0/24`.
    pub fn cidr(&self) -> String {
        self.0.to_string()
    }
}

impl fmt::Display for NetworkPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<Ipv4Net> for NetworkPrefix {
    type Error = String;

    fn try_from(net: Ipv4Net) -> Result<Self, Self::Error> {
        if net.prefix_len() != Self::PREFIX_LEN {
            return Err(format!(
                "expected a /{} network, got {net}",
                Self::PREFIX_LEN
            ));
        }
        Ok(Self::containing(net.addr()))
    }
}

impl From<NetworkPrefix> for Ipv4Net {
    fn from(prefix: NetworkPrefix) -> Self {
        prefix.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_and_cidr() {
        let prefix = NetworkPrefix::from_octets(192, 168, 1);
        assert_eq!(prefix.prefix(), "192.168.1");
        assert_eq!(prefix.cidr(), "192.168.1.0/24");
        assert_eq!(prefix.to_string(), "192.168.1.0/24");
    }

    #[test]
    fn test_containing_drops_host_octet() {
        let prefix = NetworkPrefix::containing(Ipv4Addr::new(10, 20, 30, 77));
        assert_eq!(prefix, NetworkPrefix::from_octets(10, 20, 30));
        assert_eq!(prefix.cidr(), "10.20.30.0/24");
    }

    #[test]
    fn test_prefix_serde() {
        let prefix = NetworkPrefix::from_octets(172, 16, 5);
        let json = serde_json::to_string(&prefix).unwrap();
        assert_eq!(json, "\"172.16.5.0/24\"");

        let back: NetworkPrefix = serde_json::from_str(&json).unwrap();
        assert_eq!(back, prefix);

        let wrong_len = serde_json::from_str::<NetworkPrefix>("\"172.16.0.0/16\"");
        assert!(wrong_len.is_err());
    }

    #[test]
    fn test_device_serializes_dotted_quads() {
        let mut device = Device::new(Ipv4Addr::new(192, 168, 1, 5));
        device.default_route = Some(Ipv4Addr::new(192, 168, 1, 20));

        let json = serde_json::to_value(&device).unwrap();
        assert_eq!(json["ipv4"], "192.168.1.5");
        assert_eq!(json["default_route"], "192.168.1.20");
        assert!(json["ipv6"].is_null());
        assert!(json["hardware_addr"].is_null());
    }
}

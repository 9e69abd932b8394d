//! Local network interface enumeration.
//!
//! Both the local-address resolver and the device enricher read interface
//! state through `InterfaceSource`, so tests can supply a fixed table.

use std::net::{IpAddr, Ipv4Addr};

use pnet::datalink;
use pnet::util::MacAddr;

use crate::error::Result;

/// A local interface with its link-layer address and assigned IPs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalInterface {
    pub name: String,
    pub mac: Option<String>,
    pub ips: Vec<IpAddr>,
    pub is_loopback: bool,
}

impl LocalInterface {
    /// Assigned addresses that are neither on a loopback interface nor
    /// loopback addresses themselves.
    pub fn routable_ips(&self) -> impl Iterator<Item = IpAddr> + '_ {
        let on_loopback = self.is_loopback;
        self.ips
            .iter()
            .copied()
            .filter(move |ip| !on_loopback && !ip.is_loopback())
    }

    pub fn routable_ipv4s(&self) -> impl Iterator<Item = Ipv4Addr> + '_ {
        self.routable_ips().filter_map(|ip| match ip {
            IpAddr::V4(v4) => Some(v4),
            IpAddr::V6(_) => None,
        })
    }
}

/// Read-only view of the host's interface configuration.
pub trait InterfaceSource: Send + Sync {
    fn interfaces(&self) -> Result<Vec<LocalInterface>>;
}

/// Interfaces as reported by the operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemInterfaces;

impl InterfaceSource for SystemInterfaces {
    fn interfaces(&self) -> Result<Vec<LocalInterface>> {
        Ok(datalink::interfaces()
            .iter()
            .map(|iface| LocalInterface {
                name: iface.name.clone(),
                mac: iface
                    .mac
                    .filter(|mac| *mac != MacAddr::zero())
                    .map(|mac| mac.to_string()),
                ips: iface.ips.iter().map(|net| net.ip()).collect(),
                is_loopback: iface.is_loopback(),
            })
            .collect())
    }
}

/// First non-loopback IPv4 address across all interfaces, in enumeration order.
pub fn first_routable_ipv4(interfaces: &[LocalInterface]) -> Option<Ipv4Addr> {
    interfaces
        .iter()
        .find_map(|iface| iface.routable_ipv4s().next())
}

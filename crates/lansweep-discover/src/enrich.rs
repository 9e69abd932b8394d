//! Per-device enrichment: address resolution plus local interface metadata.
//!
//! Hardware addresses come from the local interface table, so they are
//! only ever known for the scanning host itself. Remote MACs would need the
//! ARP cache, which is not consulted here.

use std::io;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Duration;

use lansweep_core::Device;

use crate::error::{DiscoverError, Result};
use crate::iface::{first_routable_ipv4, InterfaceSource, LocalInterface};

/// Forward/reverse address resolution.
pub trait AddressResolver: Send + Sync {
    /// Addresses associated with `ip`. May be empty.
    fn lookup(&self, ip: Ipv4Addr) -> io::Result<Vec<IpAddr>>;
}

/// Resolution through the system resolver (`getaddrinfo`).
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemResolver;

impl AddressResolver for SystemResolver {
    fn lookup(&self, ip: Ipv4Addr) -> io::Result<Vec<IpAddr>> {
        dns_lookup::lookup_host(&ip.to_string())
    }
}

/// Turns a live address into a `Device`.
///
/// Holds no per-device state; clones share the same resolver and
/// interface source and may run concurrently.
#[derive(Clone)]
pub struct Enricher {
    resolver: Arc<dyn AddressResolver>,
    interfaces: Arc<dyn InterfaceSource>,
    lookup_timeout: Duration,
}

impl Enricher {
    pub fn new(
        resolver: Arc<dyn AddressResolver>,
        interfaces: Arc<dyn InterfaceSource>,
        lookup_timeout: Duration,
    ) -> Self {
        Self {
            resolver,
            interfaces,
            lookup_timeout,
        }
    }

    pub fn system(lookup_timeout: Duration) -> Self {
        Self::new(
            Arc::new(SystemResolver),
            Arc::new(crate::iface::SystemInterfaces),
            lookup_timeout,
        )
    }

    /// Resolve `ip`, then attach hardware address and default-route hint.
    ///
    /// Any failure yields `LookupFailed` for this device only.
    pub async fn enrich(&self, ip: Ipv4Addr) -> Result<Device> {
        let resolved = self.resolve(ip).await?;

        let mut device = Device::new(ip);
        for addr in resolved {
            match addr {
                IpAddr::V4(v4) => device.ipv4 = v4,
                IpAddr::V6(v6) => device.ipv6 = Some(v6),
            }
        }

        let interfaces = self.local_interfaces(ip)?;
        device.hardware_addr = hardware_addr_for(&interfaces, ip);

        // Re-read so the hint reflects the table at the time of this step.
        let interfaces = self.local_interfaces(ip)?;
        device.default_route = first_routable_ipv4(&interfaces);

        tracing::debug!(
            ip = %ip,
            ipv6 = ?device.ipv6,
            hardware_addr = ?device.hardware_addr,
            "Device enriched"
        );
        Ok(device)
    }

    async fn resolve(&self, ip: Ipv4Addr) -> Result<Vec<IpAddr>> {
        let resolver = Arc::clone(&self.resolver);
        let lookup = tokio::task::spawn_blocking(move || resolver.lookup(ip));

        match tokio::time::timeout(self.lookup_timeout, lookup).await {
            Ok(Ok(Ok(addrs))) => Ok(addrs),
            Ok(Ok(Err(e))) => Err(DiscoverError::LookupFailed {
                ip,
                reason: format!("address resolution failed: {e}"),
            }),
            Ok(Err(e)) => Err(DiscoverError::LookupFailed {
                ip,
                reason: format!("resolver task failed: {e}"),
            }),
            Err(_) => Err(DiscoverError::LookupFailed {
                ip,
                reason: format!(
                    "address resolution timed out after {}s",
                    self.lookup_timeout.as_secs()
                ),
            }),
        }
    }

    fn local_interfaces(&self, ip: Ipv4Addr) -> Result<Vec<LocalInterface>> {
        self.interfaces
            .interfaces()
            .map_err(|e| DiscoverError::LookupFailed {
                ip,
                reason: format!("interface enumeration failed: {e}"),
            })
    }
}

/// MAC of the first non-loopback interface that owns `ip`.
fn hardware_addr_for(interfaces: &[LocalInterface], ip: Ipv4Addr) -> Option<String> {
    let target = IpAddr::V4(ip);
    interfaces
        .iter()
        .find(|iface| iface.routable_ips().any(|addr| addr == target))
        .and_then(|iface| iface.mac.clone())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::HashMap;

    use super::*;

    /// Canned resolver answers keyed by queried address. Unknown addresses
    /// resolve to themselves.
    #[derive(Default)]
    pub struct FakeResolver {
        pub answers: HashMap<Ipv4Addr, Vec<IpAddr>>,
        pub failing: Vec<Ipv4Addr>,
        pub delay: Option<Duration>,
    }

    impl AddressResolver for FakeResolver {
        fn lookup(&self, ip: Ipv4Addr) -> io::Result<Vec<IpAddr>> {
            if let Some(delay) = self.delay {
                std::thread::sleep(delay);
            }
            if self.failing.contains(&ip) {
                return Err(io::Error::new(io::ErrorKind::NotFound, "no such host"));
            }
            Ok(self
                .answers
                .get(&ip)
                .cloned()
                .unwrap_or_else(|| vec![IpAddr::V4(ip)]))
        }
    }
}

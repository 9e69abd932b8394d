//! Picks the scanning host's own IPv4 address.

use std::net::Ipv4Addr;

use crate::error::{DiscoverError, Result};
use crate::iface::{first_routable_ipv4, InterfaceSource};

/// Return the first non-loopback IPv4 address assigned to a local interface.
///
/// Fails with `NoAddressFound` when the host is offline, IPv6-only, or its
/// interface table cannot be read.
pub fn resolve_local_ipv4(source: &dyn InterfaceSource) -> Result<Ipv4Addr> {
    let interfaces = source.interfaces().map_err(|e| {
        tracing::warn!(error = %e, "Failed to enumerate local interfaces");
        DiscoverError::NoAddressFound
    })?;

    let addr = first_routable_ipv4(&interfaces).ok_or(DiscoverError::NoAddressFound)?;
    tracing::debug!(local_ip = %addr, "Resolved local address");
    Ok(addr)
}

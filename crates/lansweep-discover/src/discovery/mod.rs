//! Host discovery: sweep a /24 and report which addresses are live.
//!
//! The sweep itself is delegated to an external mechanism behind
//! `HostDiscovery`; `NmapDiscovery` is the stock implementation.

pub mod nmap;
pub mod nmap_xml;

use async_trait::async_trait;
use lansweep_core::NetworkPrefix;

use crate::error::Result;

pub use nmap::NmapDiscovery;
pub use nmap_xml::NmapRun;

/// Raw output of a sweep, before live addresses are extracted.
#[derive(Debug, Clone)]
pub enum RawReport {
    /// Line-oriented text with `scan report for <ipv4>` announcements.
    Text(String),
    /// Nmap XML, already deserialized.
    Structured(NmapRun),
}

/// A ping-sweep capability.
#[async_trait]
pub trait HostDiscovery: Send + Sync {
    /// Probe every address of `prefix` and return the raw report.
    ///
    /// Any failure is fatal to the sweep; no partial re-sweep is attempted.
    async fn discover(&self, prefix: &NetworkPrefix) -> Result<RawReport>;

    /// Short label used in logs.
    fn name(&self) -> &str;
}

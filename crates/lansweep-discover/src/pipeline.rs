//! Sweep pipeline: local address → /24 → discovery → parse → enrich → aggregate.
//!
//! Each stage consumes the previous stage's output. Enrichment results are
//! carried per address so one device's failure never affects another.

use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use lansweep_core::{Device, NetworkPrefix};
use serde::Serialize;
use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::discovery::HostDiscovery;
use crate::enrich::Enricher;
use crate::error::{DiscoverError, Result};
use crate::iface::InterfaceSource;
use crate::local_addr::resolve_local_ipv4;
use crate::parser;
use crate::subnet::derive_subnet;

/// A live address that was dropped because enrichment failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedDevice {
    pub ip: Ipv4Addr,
    pub reason: String,
}

/// Everything a single sweep produced, ready for the reporting sink.
#[derive(Debug, Clone, Serialize)]
pub struct ScanOutcome {
    pub scan_id: Uuid,
    pub started_at: DateTime<Utc>,
    /// Address the /24 was derived from.
    pub local_addr: String,
    pub prefix: NetworkPrefix,
    /// Name of the discovery mechanism used.
    pub discovery: String,
    /// Enriched devices in report order.
    pub devices: Vec<Device>,
    pub skipped: Vec<SkippedDevice>,
    pub duration_ms: u64,
}

/// The collaborators a sweep needs.
pub struct Scanner {
    interfaces: Arc<dyn InterfaceSource>,
    discovery: Arc<dyn HostDiscovery>,
    enricher: Enricher,
    max_concurrent_lookups: usize,
}

impl Scanner {
    pub fn new(
        interfaces: Arc<dyn InterfaceSource>,
        discovery: Arc<dyn HostDiscovery>,
        enricher: Enricher,
        max_concurrent_lookups: usize,
    ) -> Self {
        Self {
            interfaces,
            discovery,
            enricher,
            max_concurrent_lookups: max_concurrent_lookups.max(1),
        }
    }

    /// Run one sweep.
    ///
    /// `origin` replaces the resolved local address as the source of the
    /// /24. Local-address, subnet and discovery failures abort the sweep;
    /// enrichment failures only drop the affected device.
    pub async fn run_scan(&self, origin: Option<&str>) -> Result<ScanOutcome> {
        let scan_id = Uuid::new_v4();
        let started_at = Utc::now();
        let start = Instant::now();

        let local_addr = match origin {
            Some(addr) => addr.trim().to_string(),
            None => resolve_local_ipv4(self.interfaces.as_ref())?.to_string(),
        };
        let prefix = derive_subnet(&local_addr)?;

        tracing::info!(
            scan_id = %scan_id,
            local_ip = %local_addr,
            cidr = %prefix,
            discovery = self.discovery.name(),
            "Scanning subnet"
        );

        let report = self.discovery.discover(&prefix).await?;
        let live = parser::live_hosts(&report);
        tracing::info!(scan_id = %scan_id, live_hosts = live.len(), "Discovery report parsed");

        let outcomes = enrich_all(&self.enricher, live, self.max_concurrent_lookups).await;
        let (devices, skipped) = aggregate(outcomes);
        let duration_ms = start.elapsed().as_millis() as u64;

        tracing::info!(
            scan_id = %scan_id,
            cidr = %prefix,
            devices = devices.len(),
            skipped = skipped.len(),
            duration_ms,
            "Scan complete"
        );

        Ok(ScanOutcome {
            scan_id,
            started_at,
            local_addr,
            prefix,
            discovery: self.discovery.name().to_string(),
            devices,
            skipped,
            duration_ms,
        })
    }
}

/// Enrich every address, at most `max_concurrent` at a time.
///
/// Results come back in the order of `addrs` regardless of completion order.
pub async fn enrich_all(
    enricher: &Enricher,
    addrs: Vec<Ipv4Addr>,
    max_concurrent: usize,
) -> Vec<(Ipv4Addr, Result<Device>)> {
    let semaphore = Arc::new(Semaphore::new(max_concurrent.max(1)));
    let mut handles = Vec::with_capacity(addrs.len());

    for ip in addrs {
        let enricher = enricher.clone();
        let semaphore = Arc::clone(&semaphore);
        let handle = tokio::spawn(async move {
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    return Err(DiscoverError::LookupFailed {
                        ip,
                        reason: e.to_string(),
                    })
                }
            };
            enricher.enrich(ip).await
        });
        handles.push((ip, handle));
    }

    let mut outcomes = Vec::with_capacity(handles.len());
    for (ip, handle) in handles {
        let result = match handle.await {
            Ok(result) => result,
            Err(e) => Err(DiscoverError::LookupFailed {
                ip,
                reason: format!("enrichment task failed: {e}"),
            }),
        };
        outcomes.push((ip, result));
    }
    outcomes
}

/// Split per-address results into devices and skipped addresses, keeping order.
pub fn aggregate(outcomes: Vec<(Ipv4Addr, Result<Device>)>) -> (Vec<Device>, Vec<SkippedDevice>) {
    let mut devices = Vec::with_capacity(outcomes.len());
    let mut skipped = Vec::new();

    for (ip, result) in outcomes {
        match result {
            Ok(device) => devices.push(device),
            Err(e) => {
                tracing::warn!(ip = %ip, error = %e, "Error getting device details, skipping");
                skipped.push(SkippedDevice {
                    ip,
                    reason: e.to_string(),
                });
            }
        }
    }

    (devices, skipped)
}

//! Nmap process wrapper.
//!
//! Runs `nmap -sn` as a child process via `tokio::process::Command` and
//! returns its normal or XML output as a `RawReport`.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use lansweep_core::NetworkPrefix;
use tokio::process::Command;

use crate::config::DiscoverConfig;
use crate::discovery::{nmap_xml, HostDiscovery, RawReport};
use crate::error::{DiscoverError, Result};

/// Ping sweep backed by the nmap binary.
#[derive(Debug, Clone)]
pub struct NmapDiscovery {
    nmap_path: String,
    structured: bool,
    timeout: Duration,
}

impl NmapDiscovery {
    pub fn new(nmap_path: &str, structured: bool, timeout: Duration) -> Self {
        Self {
            nmap_path: nmap_path.to_string(),
            structured,
            timeout,
        }
    }

    pub fn from_config(config: &DiscoverConfig) -> Self {
        Self::new(
            &config.nmap_path,
            config.structured_output,
            config.discovery_timeout(),
        )
    }

    /// Verify nmap is installed and return its version banner.
    pub async fn verify_installation(&self) -> Result<String> {
        let output = Command::new(&self.nmap_path)
            .arg("--version")
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| DiscoverError::DiscoveryFailed {
                reason: format!("nmap not runnable at {}: {e}", self.nmap_path),
            })?;

        if !output.status.success() {
            return Err(DiscoverError::DiscoveryFailed {
                reason: format!(
                    "nmap --version exited with code {}: {}",
                    output.status.code().unwrap_or(-1),
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        String::from_utf8(output.stdout).map_err(|e| DiscoverError::DiscoveryFailed {
            reason: format!("nmap --version printed non-UTF-8 output: {e}"),
        })
    }

    /// Arguments for a ping sweep of `prefix`.
    pub fn sweep_args(&self, prefix: &NetworkPrefix) -> Vec<String> {
        let mut args = vec!["-sn".to_string()];
        if self.structured {
            args.extend(["-oX".to_string(), "-".to_string()]);
        }
        args.push("--noninteractive".to_string());
        args.push(prefix.cidr());
        args
    }
}

#[async_trait]
impl HostDiscovery for NmapDiscovery {
    async fn discover(&self, prefix: &NetworkPrefix) -> Result<RawReport> {
        let start = Instant::now();
        let args = self.sweep_args(prefix);

        tracing::info!(
            cidr = %prefix,
            structured = self.structured,
            timeout_secs = self.timeout.as_secs(),
            "Starting nmap ping sweep"
        );

        let mut command = Command::new(&self.nmap_path);
        command.args(&args).kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(DiscoverError::DiscoveryFailed {
                    reason: format!("failed to run {}: {e}", self.nmap_path),
                })
            }
            Err(_) => {
                return Err(DiscoverError::DiscoveryFailed {
                    reason: format!("nmap did not finish within {}s", self.timeout.as_secs()),
                })
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DiscoverError::DiscoveryFailed {
                reason: format!(
                    "nmap exited with code {}: {}",
                    output.status.code().unwrap_or(-1),
                    stderr.trim()
                ),
            });
        }

        let report = if self.structured {
            RawReport::Structured(nmap_xml::parse_nmap_xml(&output.stdout)?)
        } else {
            let text = String::from_utf8(output.stdout).map_err(|e| {
                DiscoverError::DiscoveryFailed {
                    reason: format!("nmap printed non-UTF-8 output: {e}"),
                }
            })?;
            RawReport::Text(text)
        };

        tracing::info!(
            cidr = %prefix,
            duration_ms = start.elapsed().as_millis(),
            "Nmap ping sweep complete"
        );

        Ok(report)
    }

    fn name(&self) -> &str {
        "nmap"
    }
}

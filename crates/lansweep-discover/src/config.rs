//! Configuration for the lansweep scanner.

use std::time::Duration;

use serde::Deserialize;

use crate::error::{DiscoverError, Result};

/// Top-level discover configuration.
///
/// Loaded from `lansweep.toml` `[discover]` section or
/// `LANSWEEP__DISCOVER__` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoverConfig {
    /// Path to the nmap binary (default: "nmap").
    #[serde(default = "default_nmap_path")]
    pub nmap_path: String,

    /// Ask nmap for XML output instead of the normal text report.
    #[serde(default)]
    pub structured_output: bool,

    /// Upper bound on the whole ping sweep, in seconds.
    #[serde(default = "default_discovery_timeout")]
    pub discovery_timeout_secs: u64,

    /// Upper bound on a single address lookup, in seconds.
    #[serde(default = "default_lookup_timeout")]
    pub lookup_timeout_secs: u64,

    /// Maximum devices enriched at once. 1 enriches strictly in sequence.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_lookups: usize,
}

fn default_nmap_path() -> String {
    "nmap".to_string()
}

fn default_discovery_timeout() -> u64 {
    300
}

fn default_lookup_timeout() -> u64 {
    5
}

fn default_max_concurrent() -> usize {
    1
}

impl Default for DiscoverConfig {
    fn default() -> Self {
        Self {
            nmap_path: default_nmap_path(),
            structured_output: false,
            discovery_timeout_secs: default_discovery_timeout(),
            lookup_timeout_secs: default_lookup_timeout(),
            max_concurrent_lookups: default_max_concurrent(),
        }
    }
}

impl DiscoverConfig {
    /// Load the `[discover]` section from `<file_prefix>.toml` (optional)
    /// layered under `LANSWEEP__` environment variables.
    pub fn load(file_prefix: &str) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::File::with_name(file_prefix).required(false))
            .add_source(
                config::Environment::with_prefix("LANSWEEP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| DiscoverError::Config(e.to_string()))?;

        let loaded = match cfg.get::<DiscoverConfig>("discover") {
            Ok(c) => c,
            Err(config::ConfigError::NotFound(_)) => DiscoverConfig::default(),
            Err(e) => return Err(DiscoverError::Config(e.to_string())),
        };
        loaded.validate()?;
        Ok(loaded)
    }

    pub fn validate(&self) -> Result<()> {
        if self.nmap_path.trim().is_empty() {
            return Err(DiscoverError::Config("nmap_path must not be empty".into()));
        }
        if self.discovery_timeout_secs == 0 {
            return Err(DiscoverError::Config(
                "discovery_timeout_secs must be greater than zero".into(),
            ));
        }
        if self.lookup_timeout_secs == 0 {
            return Err(DiscoverError::Config(
                "lookup_timeout_secs must be greater than zero".into(),
            ));
        }
        if self.max_concurrent_lookups == 0 {
            return Err(DiscoverError::Config(
                "max_concurrent_lookups must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn discovery_timeout(&self) -> Duration {
        Duration::from_secs(self.discovery_timeout_secs)
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_secs)
    }
}

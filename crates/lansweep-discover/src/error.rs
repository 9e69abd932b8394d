//! Error types for the lansweep-discover crate.

use std::net::Ipv4Addr;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiscoverError {
    #[error("No local IPv4 address found")]
    NoAddressFound,

    #[error("Malformed IPv4 address: {addr}")]
    MalformedAddress { addr: String },

    #[error("Host discovery failed: {reason}")]
    DiscoveryFailed { reason: String },

    #[error("Lookup failed for {ip}: {reason}")]
    LookupFailed { ip: Ipv4Addr, reason: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DiscoverError>;

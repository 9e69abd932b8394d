//! lansweep-discover: Local subnet discovery and device enrichment.
//!
//! Resolves the local /24, sweeps it with nmap, and enriches every live
//! host with address and interface metadata.

pub mod config;
pub mod discovery;
pub mod enrich;
pub mod error;
pub mod iface;
pub mod local_addr;
pub mod parser;
pub mod pipeline;
pub mod render;
pub mod subnet;

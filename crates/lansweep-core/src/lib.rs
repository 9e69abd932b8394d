//! lansweep-core: Shared types for the lansweep discovery pipeline.
//!
//! - `Device`, the per-host record produced by enrichment
//! - `NetworkPrefix`, the /24 range a sweep covers

pub mod types;

pub use types::{Device, NetworkPrefix};

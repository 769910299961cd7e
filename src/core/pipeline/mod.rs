//! # Pipeline Module
//!
//! Orchestrates one scan from request to result.
//!
//! ## Stages
//! 1. **Enumerating** - List the image files directly inside the source folder
//! 2. **Fingerprinting** - Fingerprint each file with the chosen strategy
//! 3. **Relocating** - Move duplicate group members into the destination
//!
//! A scan ends `Completed` or `Aborted`. Cancellation and internal failures
//! abort before anything is moved.
//!
//! ## Parallelism
//! Fingerprinting runs on a bounded rayon pool. A single collector thread
//! owns the duplicate index and inserts in enumeration order.

mod cancel;
mod config;
mod executor;
mod result;
mod service;
mod state;

pub use cancel::CancellationToken;
pub use config::{EngineConfig, ScanRequest};
pub use executor::{ScanEngine, ScanEngineBuilder};
pub use result::{ScanOutcome, ScanResult};
pub use service::{ScanHandle, ScanService};
pub use state::ScanState;

//! # Core Module
//!
//! The UI-agnostic duplicate detection engine.
//!
//! ## Modules
//! - `scanner` - Lists image files in the source folder
//! - `hasher` - Computes a fingerprint per file under one strategy
//! - `comparator` - Groups files that share a fingerprint
//! - `relocate` - Moves duplicate group members into the destination
//! - `pipeline` - Orchestrates a scan and tracks its state

pub mod comparator;
pub mod hasher;
pub mod pipeline;
pub mod relocate;
pub mod scanner;

// Re-export commonly used types
pub use comparator::{DuplicateGroup, DuplicateIndex};
pub use hasher::{Fingerprint, FingerprintStrategy, StrategyKind};
pub use pipeline::{CancellationToken, ScanEngine, ScanRequest, ScanResult, ScanService};
pub use relocate::{RelocationExecutor, RelocationPolicy};
pub use scanner::{DirectoryEnumerator, FileEnumerator};

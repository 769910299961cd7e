//! # Duplicate Image Mover
//!
//! Finds duplicate images in one folder and moves them into another.
//!
//! ## Core Philosophy
//! - **Never delete** - Duplicates are moved into a review folder, never removed
//! - **Never overwrite** - An existing file in the destination is left alone
//! - **Report everything** - Every skipped file and failed move is surfaced
//!
//! ## Architecture
//! - `core` - The detection engine (enumerate, fingerprint, group, relocate)
//! - `events` - Event-driven progress reporting
//! - `error` - Typed errors and the kinds shown to users
//!
//! ## Example
//! ```rust,ignore
//! use duplicate_image_mover::core::{ScanEngine, ScanRequest, StrategyKind};
//!
//! let engine = ScanEngine::builder().build();
//! let result = engine.run(&ScanRequest::new("in", "dupes", StrategyKind::Exact))?;
//! println!("{}", result.outcome());
//! ```

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{DedupError, Result};

/// Initialize tracing for the library
///
/// This should be called by the application entry point. `RUST_LOG` wins
/// over `default_filter` when set.
pub fn init_tracing(default_filter: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global default tracing subscriber");
}

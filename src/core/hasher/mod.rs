//! # Hasher Module
//!
//! Computes a fingerprint per file under one of four strategies.
//!
//! ## Strategies
//! - **Exact** - SHA-256 of the file bytes; byte-identical copies only
//! - **Average (aHash)** - 8x8 grayscale grid, one bit per cell vs. the mean
//! - **Mean color** - average RGB over a 64x64 canvas; very coarse
//! - **Perceptual (pHash)** - DCT low frequencies vs. the median; costliest
//!
//! Fingerprints are compared for equality only; there is no distance
//! threshold. A strategy is chosen once per scan and never mixed.
//!
//! ## Performance
//! - JPEG files are decoded with `zune-jpeg`, everything else with `image`
//!
//! ## Example
//! ```rust,ignore
//! use duplicate_image_mover::core::hasher::{StrategyConfig, StrategyKind};
//!
//! let strategy = StrategyConfig::new()
//!     .kind(StrategyKind::FrequencyPerceptual)
//!     .build();
//!
//! let fingerprint = strategy.fingerprint(&path)?;
//! ```

mod algorithms;
mod decode;
mod traits;

pub use algorithms::{AverageStrategy, ExactStrategy, MeanColorStrategy, PerceptualStrategy};
pub use decode::decode_image;
pub use traits::{Fingerprint, FingerprintStrategy, StrategyKind};

/// Configuration builder for strategies
#[derive(Debug, Clone)]
pub struct StrategyConfig {
    /// Grid size for the perceptual strategies (8 gives 64-bit fingerprints)
    hash_size: u32,
    kind: StrategyKind,
}

impl StrategyConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self {
            hash_size: 8,
            kind: StrategyKind::Exact,
        }
    }

    /// Set the grid size used by aHash and pHash
    pub fn hash_size(mut self, size: u32) -> Self {
        self.hash_size = size;
        self
    }

    /// Set the strategy
    pub fn kind(mut self, kind: StrategyKind) -> Self {
        self.kind = kind;
        self
    }

    /// Build the strategy
    pub fn build(self) -> Box<dyn FingerprintStrategy> {
        match self.kind {
            StrategyKind::Exact => Box::new(ExactStrategy::new()),
            StrategyKind::AveragePerceptual => Box::new(AverageStrategy::new(self.hash_size)),
            StrategyKind::MeanColor => Box::new(MeanColorStrategy::new()),
            StrategyKind::FrequencyPerceptual => {
                Box::new(PerceptualStrategy::new(self.hash_size))
            }
        }
    }
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self::new()
    }
}

//! Trait definitions for fingerprint strategies.

use crate::error::FingerprintError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Strategy-specific similarity key.
///
/// Two files with equal fingerprints under the same strategy are duplicates.
/// Fingerprints from different strategies are never compared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Render raw bytes as lowercase hexadecimal
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(bytes.iter().map(|b| format!("{:02x}", b)).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Available fingerprint strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StrategyKind {
    /// SHA-256 of the file bytes - byte-identical copies only
    #[default]
    Exact,
    /// Average hash (aHash) over an 8x8 grayscale grid
    AveragePerceptual,
    /// Average RGB color over a 64x64 canvas
    MeanColor,
    /// DCT-based perceptual hash (pHash)
    FrequencyPerceptual,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::Exact,
        StrategyKind::AveragePerceptual,
        StrategyKind::MeanColor,
        StrategyKind::FrequencyPerceptual,
    ];

    /// Get a human-readable description of the strategy
    pub fn description(&self) -> &'static str {
        match self {
            StrategyKind::Exact => "Exact Match - finds identical copies. Fast.",
            StrategyKind::AveragePerceptual => {
                "Perceptual Hashing - detects visually similar images. Slower."
            }
            StrategyKind::MeanColor => "Mean Color Hash - compares overall color. Coarse.",
            StrategyKind::FrequencyPerceptual => {
                "DCT Perceptual Hashing - robust to brightness shifts. Slowest."
            }
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyKind::Exact => write!(f, "exact"),
            StrategyKind::AveragePerceptual => write!(f, "average"),
            StrategyKind::MeanColor => write!(f, "mean-color"),
            StrategyKind::FrequencyPerceptual => write!(f, "perceptual"),
        }
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exact" | "sha256" => Ok(StrategyKind::Exact),
            "average" | "ahash" => Ok(StrategyKind::AveragePerceptual),
            "mean-color" | "mean_color" | "color" => Ok(StrategyKind::MeanColor),
            "perceptual" | "phash" => Ok(StrategyKind::FrequencyPerceptual),
            other => Err(format!("unknown strategy: {}", other)),
        }
    }
}

/// Computes a fingerprint for one file.
///
/// Implementations are pure functions of the file contents and hold no
/// per-file state, so one instance is shared by every worker in a scan.
pub trait FingerprintStrategy: Send + Sync {
    fn fingerprint(&self, path: &Path) -> Result<Fingerprint, FingerprintError>;

    /// Get the strategy kind
    fn kind(&self) -> StrategyKind;
}

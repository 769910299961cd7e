//! Scan request and engine configuration.

use crate::core::hasher::StrategyKind;
use crate::core::relocate::RelocationPolicy;
use crate::error::DedupError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// What the collaborator asks for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRequest {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub strategy: StrategyKind,
}

impl ScanRequest {
    pub fn new(
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        strategy: StrategyKind,
    ) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            strategy,
        }
    }

    /// Both paths must be existing directories and must differ
    pub fn validate(&self) -> Result<(), DedupError> {
        let source = existing_directory(&self.source, "source")?;
        let destination = existing_directory(&self.destination, "destination")?;

        if source == destination {
            return Err(DedupError::InvalidConfiguration(format!(
                "source and destination must be different folders ({})",
                source.display()
            )));
        }

        Ok(())
    }
}

fn existing_directory(path: &Path, role: &str) -> Result<PathBuf, DedupError> {
    if !path.is_dir() {
        return Err(DedupError::InvalidConfiguration(format!(
            "{} folder does not exist or is not a directory: {}",
            role,
            path.display()
        )));
    }

    fs::canonicalize(path).map_err(|e| {
        DedupError::InvalidConfiguration(format!(
            "cannot resolve {} folder {}: {}",
            role,
            path.display(),
            e
        ))
    })
}

/// Engine-wide settings that outlive a single scan
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Which group members get moved
    pub policy: RelocationPolicy,
    /// Fingerprinting workers (None = available cores)
    pub worker_threads: Option<usize>,
    /// Grid size for aHash and pHash
    pub hash_size: u32,
}

impl EngineConfig {
    /// Resolved worker count, at least one
    pub fn effective_threads(&self) -> usize {
        self.worker_threads
            .unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(1)
            })
            .max(1)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            policy: RelocationPolicy::MoveAll,
            worker_threads: None,
            hash_size: 8,
        }
    }
}

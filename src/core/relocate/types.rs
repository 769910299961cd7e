//! Types for the relocate module.

use crate::core::hasher::Fingerprint;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which members of a duplicate group are moved
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RelocationPolicy {
    /// Every member goes to the destination, which acts as a review bin
    #[default]
    MoveAll,
    /// The first member stays in place, the rest are moved
    KeepFirst,
}

impl std::fmt::Display for RelocationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelocationPolicy::MoveAll => write!(f, "move-all"),
            RelocationPolicy::KeepFirst => write!(f, "keep-first"),
        }
    }
}

/// A completed move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovedFile {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// A move that did not happen; the file stays where it was
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelocationFailure {
    pub path: PathBuf,
    /// Fingerprint of the group the file belongs to
    pub group: Fingerprint,
    pub message: String,
}

/// Outcome of one relocation pass
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelocationSummary {
    /// Groups with two or more members
    pub duplicate_groups_found: usize,
    /// Files actually moved by this pass
    pub files_moved: usize,
    /// Members skipped because they are already in the destination
    pub already_relocated: usize,
    pub moved: Vec<MovedFile>,
    pub failures: Vec<RelocationFailure>,
    pub duration_ms: u64,
}

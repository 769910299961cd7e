//! Scan results and the user-facing outcome.

use crate::core::hasher::StrategyKind;
use crate::core::relocate::{MovedFile, RelocationPolicy};
use crate::error::DedupError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Final summary of one scan, immutable once produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    pub scan_id: Uuid,
    pub strategy: StrategyKind,
    pub policy: RelocationPolicy,
    /// Files returned by the enumerator
    pub total_files_scanned: usize,
    /// Groups with two or more members
    pub duplicate_groups_found: usize,
    pub files_moved: usize,
    /// Files that could not be read or decoded
    pub files_skipped: usize,
    /// Moves that failed; those files stay in the source folder
    pub relocation_failures: usize,
    pub moved: Vec<MovedFile>,
    pub started_at: DateTime<Utc>,
    /// Scan start to relocation end
    pub elapsed: Duration,
}

impl ScanResult {
    pub fn outcome(&self) -> ScanOutcome {
        if self.duplicate_groups_found == 0 {
            ScanOutcome::NoDuplicates
        } else {
            ScanOutcome::DuplicatesFound {
                groups: self.duplicate_groups_found,
                moved: self.files_moved,
            }
        }
    }

    /// Elapsed time as `H:MM:SS`, whole seconds
    pub fn elapsed_display(&self) -> String {
        let secs = self.elapsed.as_secs();
        format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}

/// What the user is told at the end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanOutcome {
    NoDuplicates,
    DuplicatesFound { groups: usize, moved: usize },
    Aborted { reason: String },
}

impl ScanOutcome {
    pub fn from_result(result: &Result<ScanResult, DedupError>) -> Self {
        match result {
            Ok(result) => result.outcome(),
            Err(e) => ScanOutcome::Aborted {
                reason: e.to_string(),
            },
        }
    }
}

impl std::fmt::Display for ScanOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanOutcome::NoDuplicates => write!(f, "No duplicates found."),
            ScanOutcome::DuplicatesFound { groups, moved } => write!(
                f,
                "{} duplicate group{} found, {} file{} moved.",
                groups,
                if *groups == 1 { "" } else { "s" },
                moved,
                if *moved == 1 { "" } else { "s" }
            ),
            ScanOutcome::Aborted { reason } => write!(f, "Scan aborted: {}", reason),
        }
    }
}

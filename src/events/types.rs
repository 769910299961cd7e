//! Event type definitions for progress reporting.

use crate::core::hasher::StrategyKind;
use crate::core::pipeline::{ScanResult, ScanState};
use crate::error::ErrorKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// All events emitted by a scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Enumeration phase events
    Scan(ScanEvent),
    /// Fingerprinting phase events
    Fingerprint(FingerprintEvent),
    /// Relocation phase events
    Relocate(RelocateEvent),
    /// Scan-level lifecycle events
    Pipeline(PipelineEvent),
    /// A per-file failure or a fatal abort
    Error(ErrorEvent),
}

/// Events during enumeration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    /// Enumeration has started
    Started { directory: PathBuf },
    /// Enumeration completed
    Completed { total_files: usize },
}

/// Events during the fingerprinting phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FingerprintEvent {
    /// Fingerprinting has started
    Started {
        total_files: usize,
        strategy: StrategyKind,
    },
    /// One more file has been processed
    Progress(FingerprintProgress),
    /// Fingerprinting completed
    Completed { fingerprinted: usize, skipped: usize },
}

/// Progress information during fingerprinting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FingerprintProgress {
    /// Number of files processed so far (fingerprinted or skipped)
    pub completed: usize,
    /// Total number of files to process
    pub total: usize,
    /// `completed / total`, in `[0, 1]`
    pub fraction: f64,
    /// The file that just finished
    pub current_path: PathBuf,
}

impl FingerprintProgress {
    pub fn new(completed: usize, total: usize, current_path: PathBuf) -> Self {
        let fraction = if total == 0 {
            1.0
        } else {
            (completed as f64 / total as f64).clamp(0.0, 1.0)
        };
        Self {
            completed,
            total,
            fraction,
            current_path,
        }
    }
}

/// Events during relocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RelocateEvent {
    /// Relocation has started
    Started { duplicate_groups: usize },
    /// A file was moved into the destination
    FileMoved { from: PathBuf, to: PathBuf },
    /// Relocation completed
    Completed { files_moved: usize, failures: usize },
}

/// Scan-level lifecycle events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEvent {
    /// A scan has been accepted
    Started { scan_id: Uuid },
    /// The orchestrator entered a new state
    PhaseChanged { phase: ScanState },
    /// Scan completed successfully
    Completed { result: ScanResult },
    /// Scan was aborted (cancelled or internal failure); nothing was moved
    Aborted { reason: String },
}

/// A reported failure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEvent {
    /// The file involved, if the failure is per-file
    pub file_path: Option<PathBuf>,
    pub kind: ErrorKind,
    pub message: String,
}

impl ErrorEvent {
    pub fn for_file(path: PathBuf, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            file_path: Some(path),
            kind,
            message: message.into(),
        }
    }

    pub fn fatal(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            file_path: None,
            kind,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_serializable() {
        let event = Event::Fingerprint(FingerprintEvent::Progress(FingerprintProgress::new(
            5,
            10,
            PathBuf::from("/photos/a.png"),
        )));

        let json = serde_json::to_string(&event).unwrap();
        let deserialized: Event = serde_json::from_str(&json).unwrap();

        match deserialized {
            Event::Fingerprint(FingerprintEvent::Progress(p)) => {
                assert_eq!(p.completed, 5);
                assert_eq!(p.fraction, 0.5);
            }
            _ => panic!("Wrong event type"),
        }
    }

    #[test]
    fn progress_fraction_is_clamped() {
        let p = FingerprintProgress::new(12, 10, PathBuf::from("x.png"));
        assert_eq!(p.fraction, 1.0);
    }

    #[test]
    fn error_event_serializes_kind() {
        let event = ErrorEvent::for_file(
            PathBuf::from("/photos/broken.png"),
            ErrorKind::UnreadableImage,
            "bad header",
        );
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("UnreadableImage"));
        assert!(json.contains("broken.png"));
    }
}

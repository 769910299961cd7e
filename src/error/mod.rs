//! # Error Module
//!
//! Error types for the duplicate image mover.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, file names, what went wrong
//! - **Per-file failures are local** - they are reported and the scan continues
//! - **Fatal failures are rare** - bad configuration, cancellation, internal defects

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Top-level engine error
#[derive(Error, Debug)]
pub enum DedupError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Enumeration error: {0}")]
    Scan(#[from] ScanError),

    #[error("Scan was cancelled")]
    Cancelled,

    #[error("A scan is already running; wait for it to finish or cancel it")]
    ScanInProgress,

    #[error("Internal failure: {0}")]
    Internal(String),
}

impl DedupError {
    /// Map this error onto the public error taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            DedupError::InvalidConfiguration(_) | DedupError::ScanInProgress => {
                ErrorKind::InvalidConfiguration
            }
            // The source directory vanished between validation and enumeration
            DedupError::Scan(_) => ErrorKind::InvalidConfiguration,
            DedupError::Cancelled => ErrorKind::Cancelled,
            DedupError::Internal(_) => ErrorKind::InternalFailure,
        }
    }
}

/// Errors raised while enumerating the source directory
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while fingerprinting a single file
#[derive(Error, Debug)]
pub enum FingerprintError {
    #[error("Failed to read file {path}: {source}")]
    UnreadableFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode image {path}: {reason}")]
    UnreadableImage { path: PathBuf, reason: String },
}

impl FingerprintError {
    pub fn path(&self) -> &PathBuf {
        match self {
            FingerprintError::UnreadableFile { path, .. } => path,
            FingerprintError::UnreadableImage { path, .. } => path,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            FingerprintError::UnreadableFile { .. } => ErrorKind::UnreadableFile,
            FingerprintError::UnreadableImage { .. } => ErrorKind::UnreadableImage,
        }
    }
}

/// Errors that occur while moving one member of a duplicate group
#[derive(Error, Debug)]
pub enum RelocationError {
    #[error("Source file vanished before it could be moved: {path}")]
    SourceMissing { path: PathBuf },

    #[error("Refusing to overwrite existing file {destination} while moving {path}")]
    DestinationExists { path: PathBuf, destination: PathBuf },

    #[error("Failed to move {path} to {destination}: {source}")]
    Io {
        path: PathBuf,
        destination: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RelocationError {
    pub fn path(&self) -> &PathBuf {
        match self {
            RelocationError::SourceMissing { path } => path,
            RelocationError::DestinationExists { path, .. } => path,
            RelocationError::Io { path, .. } => path,
        }
    }
}

/// Error categories reported to the collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Bad source/destination paths; the scan never starts
    InvalidConfiguration,
    /// A file could not be opened or read; skipped
    UnreadableFile,
    /// A file could not be decoded as an image; skipped
    UnreadableImage,
    /// A move failed; the file stays in the source directory
    RelocationFailure,
    /// Unexpected defect; aborts the scan
    InternalFailure,
    /// The caller cancelled the scan
    Cancelled,
}

impl ErrorKind {
    /// Whether this kind of error ends the scan
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ErrorKind::InvalidConfiguration | ErrorKind::InternalFailure | ErrorKind::Cancelled
        )
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::InvalidConfiguration => write!(f, "invalid configuration"),
            ErrorKind::UnreadableFile => write!(f, "unreadable file"),
            ErrorKind::UnreadableImage => write!(f, "unreadable image"),
            ErrorKind::RelocationFailure => write!(f, "relocation failure"),
            ErrorKind::InternalFailure => write!(f, "internal failure"),
            ErrorKind::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, DedupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_error_includes_path() {
        let error = ScanError::DirectoryNotFound {
            path: PathBuf::from("/photos/vacation"),
        };
        let message = error.to_string();
        assert!(message.contains("/photos/vacation"));
    }

    #[test]
    fn fingerprint_error_includes_path_and_reason() {
        let error = FingerprintError::UnreadableImage {
            path: PathBuf::from("/photos/broken.jpg"),
            reason: "invalid JPEG".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("/photos/broken.jpg"));
        assert!(message.contains("invalid JPEG"));
        assert_eq!(error.kind(), ErrorKind::UnreadableImage);
    }

    #[test]
    fn per_file_kinds_are_not_fatal() {
        assert!(!ErrorKind::UnreadableFile.is_fatal());
        assert!(!ErrorKind::UnreadableImage.is_fatal());
        assert!(!ErrorKind::RelocationFailure.is_fatal());
        assert!(ErrorKind::InternalFailure.is_fatal());
        assert!(ErrorKind::InvalidConfiguration.is_fatal());
    }

    #[test]
    fn enumeration_failure_is_a_configuration_error() {
        let error = DedupError::from(ScanError::NotADirectory {
            path: PathBuf::from("/photos/file.png"),
        });
        assert_eq!(error.kind(), ErrorKind::InvalidConfiguration);
    }
}

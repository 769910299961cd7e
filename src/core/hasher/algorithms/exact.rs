//! Exact-content fingerprint.
//!
//! SHA-256 over the full byte stream, read in fixed-size chunks so files
//! larger than memory are fine. Two files match iff they are byte-identical.

use super::super::traits::{Fingerprint, FingerprintStrategy, StrategyKind};
use crate::error::FingerprintError;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

const CHUNK_SIZE: usize = 8192;

/// Content digest strategy
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactStrategy;

impl ExactStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl FingerprintStrategy for ExactStrategy {
    fn fingerprint(&self, path: &Path) -> Result<Fingerprint, FingerprintError> {
        let io_error = |source| FingerprintError::UnreadableFile {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(io_error)?;
        let mut reader = BufReader::new(file);
        let mut hasher = Sha256::new();
        let mut buffer = [0u8; CHUNK_SIZE];

        loop {
            let bytes_read = reader.read(&mut buffer).map_err(io_error)?;
            if bytes_read == 0 {
                break;
            }
            hasher.update(&buffer[..bytes_read]);
        }

        Ok(Fingerprint::new(format!("{:x}", hasher.finalize())))
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Exact
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn digest_is_64_hex_chars() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.png");
        fs::write(&path, b"hello").unwrap();

        let fp = ExactStrategy::new().fingerprint(&path).unwrap();
        assert_eq!(
            fp.as_str(),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn repeated_calls_are_deterministic() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.png");
        fs::write(&path, vec![7u8; CHUNK_SIZE * 3 + 17]).unwrap();

        let strategy = ExactStrategy::new();
        assert_eq!(
            strategy.fingerprint(&path).unwrap(),
            strategy.fingerprint(&path).unwrap()
        );
    }

    #[test]
    fn one_byte_change_changes_digest() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.png");
        let b = dir.path().join("b.png");
        let mut bytes = vec![0u8; 20_000];
        fs::write(&a, &bytes).unwrap();
        bytes[19_999] = 1;
        fs::write(&b, &bytes).unwrap();

        let strategy = ExactStrategy::new();
        assert_ne!(strategy.fingerprint(&a).unwrap(), strategy.fingerprint(&b).unwrap());
    }

    #[test]
    fn missing_file_is_unreadable() {
        let err = ExactStrategy::new()
            .fingerprint(Path::new("/nonexistent/a.png"))
            .unwrap_err();
        assert!(matches!(err, FingerprintError::UnreadableFile { .. }));
    }
}

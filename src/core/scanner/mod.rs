//! # Scanner Module
//!
//! Lists candidate image files directly inside one directory.
//!
//! ## Supported Formats
//! - PNG (.png)
//! - JPEG (.jpg, .jpeg)
//! - BMP (.bmp)
//! - GIF (.gif)
//! - TIFF (.tiff)
//!
//! Subdirectories are never entered. The order of the returned paths is the
//! filesystem listing order; it is stable for one call and nothing downstream
//! relies on it being sorted.
//!
//! ## Example
//! ```rust,ignore
//! use duplicate_image_mover::core::scanner::{DirectoryEnumerator, FileEnumerator};
//!
//! let files = DirectoryEnumerator::new().enumerate(Path::new("/Users/me/Pictures"))?;
//! ```

mod filter;
mod walker;

pub use filter::{ImageFilter, ALLOWED_EXTENSIONS};
pub use walker::DirectoryEnumerator;

use crate::error::ScanError;
use std::path::{Path, PathBuf};

/// Lists candidate files in a directory.
///
/// Implement this trait to substitute a fake listing in tests.
pub trait FileEnumerator: Send + Sync {
    /// List allow-listed regular files directly inside `directory`.
    ///
    /// An empty or image-free directory yields an empty vector; a missing
    /// path or a non-directory is an error.
    fn enumerate(&self, directory: &Path) -> Result<Vec<PathBuf>, ScanError>;
}

/// Enumerate `directory` with the default enumerator
pub fn enumerate(directory: &Path) -> Result<Vec<PathBuf>, ScanError> {
    DirectoryEnumerator::new().enumerate(directory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn free_function_uses_default_enumerator() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.PNG"), b"x").unwrap();
        fs::write(temp_dir.path().join("b.txt"), b"x").unwrap();

        let files = enumerate(temp_dir.path()).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("a.PNG"));
    }
}

//! Single-level directory listing using walkdir.

use super::{filter::ImageFilter, FileEnumerator};
use crate::error::ScanError;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Enumerator that lists one directory level and applies the image allow-list
#[derive(Debug, Clone, Default)]
pub struct DirectoryEnumerator {
    filter: ImageFilter,
}

impl DirectoryEnumerator {
    pub fn new() -> Self {
        Self {
            filter: ImageFilter::new(),
        }
    }
}

impl FileEnumerator for DirectoryEnumerator {
    fn enumerate(&self, directory: &Path) -> Result<Vec<PathBuf>, ScanError> {
        // The path may have changed since the caller validated it
        if !directory.exists() {
            return Err(ScanError::DirectoryNotFound {
                path: directory.to_path_buf(),
            });
        }
        if !directory.is_dir() {
            return Err(ScanError::NotADirectory {
                path: directory.to_path_buf(),
            });
        }

        let walker = WalkDir::new(directory)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false);

        let mut files = Vec::new();

        for entry_result in walker {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    let source = e
                        .into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("directory listing failed"));
                    return Err(ScanError::ReadDirectory {
                        path: directory.to_path_buf(),
                        source,
                    });
                }
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable directory entry");
                    continue;
                }
            };

            let path = entry.path();

            // Follows symlinks, so a link to an image counts as a file
            if !path.is_file() {
                continue;
            }

            if !self.filter.should_include(path) {
                continue;
            }

            files.push(path.to_path_buf());
        }

        debug!(directory = %directory.display(), count = files.len(), "Enumerated files");

        Ok(files)
    }
}

//! # Comparator Module
//!
//! Groups files by fingerprint.
//!
//! ## How It Works
//! 1. Each fingerprinted file is inserted into a [`DuplicateIndex`]
//! 2. Files sharing a fingerprint accumulate in one [`DuplicateGroup`],
//!    in the order they were inserted
//! 3. Only groups with two or more members are duplicates
//!
//! Grouping is exact equality on the fingerprint string, so it is
//! transitive by construction.

mod index;

pub use index::DuplicateIndex;

use crate::core::hasher::Fingerprint;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Files sharing one fingerprint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// The shared key
    pub fingerprint: Fingerprint,
    /// Members in insertion (enumeration) order
    pub files: Vec<PathBuf>,
}

impl DuplicateGroup {
    pub fn new(fingerprint: Fingerprint) -> Self {
        Self {
            fingerprint,
            files: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// A group of one is never a duplicate
    pub fn is_duplicate(&self) -> bool {
        self.files.len() >= 2
    }
}

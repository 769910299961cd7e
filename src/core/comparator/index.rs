//! Fingerprint → group map built incrementally during a scan.
//!
//! Single writer: the orchestrator owns the index and is the only code that
//! inserts into it. There is no removal; a fresh index is built per scan.

use super::DuplicateGroup;
use crate::core::hasher::Fingerprint;
use std::collections::HashMap;
use std::path::PathBuf;

/// Accumulates files by fingerprint
#[derive(Debug, Default)]
pub struct DuplicateIndex {
    /// Position of each fingerprint's group in `groups`
    positions: HashMap<Fingerprint, usize>,
    /// Groups in the order their first member was inserted
    groups: Vec<DuplicateGroup>,
    total_files: usize,
}

impl DuplicateIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `path` to the group for `fingerprint`, creating it if absent
    pub fn insert(&mut self, fingerprint: Fingerprint, path: PathBuf) {
        let position = match self.positions.get(&fingerprint) {
            Some(&position) => position,
            None => {
                let position = self.groups.len();
                self.groups.push(DuplicateGroup::new(fingerprint.clone()));
                self.positions.insert(fingerprint, position);
                position
            }
        };

        self.groups[position].files.push(path);
        self.total_files += 1;
    }

    /// Every group, including singletons
    pub fn groups(&self) -> &[DuplicateGroup] {
        &self.groups
    }

    /// Groups with two or more members
    pub fn duplicate_groups(&self) -> impl Iterator<Item = &DuplicateGroup> {
        self.groups.iter().filter(|g| g.is_duplicate())
    }

    pub fn duplicate_group_count(&self) -> usize {
        self.duplicate_groups().count()
    }

    /// Look up the group for a fingerprint
    pub fn get(&self, fingerprint: &Fingerprint) -> Option<&DuplicateGroup> {
        self.positions.get(fingerprint).map(|&i| &self.groups[i])
    }

    /// Number of files inserted
    pub fn len(&self) -> usize {
        self.total_files
    }

    pub fn is_empty(&self) -> bool {
        self.total_files == 0
    }
}

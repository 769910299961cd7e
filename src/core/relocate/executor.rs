//! Moves duplicate group members into the destination directory.

use super::types::*;
use crate::core::comparator::{DuplicateGroup, DuplicateIndex};
use crate::error::{ErrorKind, RelocationError};
use crate::events::{ErrorEvent, Event, EventSender, RelocateEvent};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// What happened to one group member
enum MemberOutcome {
    Moved(PathBuf),
    AlreadyRelocated,
}

/// Executes relocation for a finished index
#[derive(Debug, Clone, Copy, Default)]
pub struct RelocationExecutor {
    policy: RelocationPolicy,
}

impl RelocationExecutor {
    pub fn new(policy: RelocationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> RelocationPolicy {
        self.policy
    }

    /// Move the members of every duplicate group into `destination`.
    ///
    /// Reads the index once and never mutates it. Singleton groups are left
    /// alone. A failed move is reported and the batch carries on; the file
    /// stays in the source directory.
    pub fn relocate(
        &self,
        index: &DuplicateIndex,
        destination: &Path,
        events: &EventSender,
    ) -> RelocationSummary {
        let start = Instant::now();
        let destination_root =
            fs::canonicalize(destination).unwrap_or_else(|_| destination.to_path_buf());

        let mut summary = RelocationSummary {
            duplicate_groups_found: index.duplicate_group_count(),
            ..Default::default()
        };

        events.send(Event::Relocate(RelocateEvent::Started {
            duplicate_groups: summary.duplicate_groups_found,
        }));

        for group in index.duplicate_groups() {
            for path in self.members_to_move(group) {
                match relocate_member(path, &destination_root) {
                    Ok(MemberOutcome::Moved(to)) => {
                        debug!(from = %path.display(), to = %to.display(), "Moved duplicate");
                        events.send(Event::Relocate(RelocateEvent::FileMoved {
                            from: path.clone(),
                            to: to.clone(),
                        }));
                        summary.files_moved += 1;
                        summary.moved.push(MovedFile {
                            from: path.clone(),
                            to,
                        });
                    }
                    Ok(MemberOutcome::AlreadyRelocated) => {
                        debug!(path = %path.display(), "Already in destination, skipping");
                        summary.already_relocated += 1;
                    }
                    Err(e) => {
                        let message = format!("{} (group {})", e, group.fingerprint);
                        warn!(path = %path.display(), group = %group.fingerprint, error = %e, "Move failed");
                        events.send(Event::Error(ErrorEvent::for_file(
                            path.clone(),
                            ErrorKind::RelocationFailure,
                            message.clone(),
                        )));
                        summary.failures.push(RelocationFailure {
                            path: path.clone(),
                            group: group.fingerprint.clone(),
                            message,
                        });
                    }
                }
            }
        }

        summary.duration_ms = start.elapsed().as_millis() as u64;

        events.send(Event::Relocate(RelocateEvent::Completed {
            files_moved: summary.files_moved,
            failures: summary.failures.len(),
        }));

        info!(
            groups = summary.duplicate_groups_found,
            moved = summary.files_moved,
            skipped = summary.already_relocated,
            failed = summary.failures.len(),
            "Relocation finished"
        );

        summary
    }

    fn members_to_move<'a>(&self, group: &'a DuplicateGroup) -> &'a [PathBuf] {
        match self.policy {
            RelocationPolicy::MoveAll => &group.files,
            RelocationPolicy::KeepFirst => group.files.get(1..).unwrap_or(&[]),
        }
    }
}

fn relocate_member(source: &Path, destination: &Path) -> Result<MemberOutcome, RelocationError> {
    // Already somewhere under the destination
    if let Ok(canonical) = fs::canonicalize(source) {
        if canonical.starts_with(destination) {
            return Ok(MemberOutcome::AlreadyRelocated);
        }
    }

    let file_name = source.file_name().ok_or_else(|| RelocationError::SourceMissing {
        path: source.to_path_buf(),
    })?;
    let target = destination.join(file_name);

    if !source.exists() {
        // A previous pass over the same index moved it
        if target.exists() {
            return Ok(MemberOutcome::AlreadyRelocated);
        }
        return Err(RelocationError::SourceMissing {
            path: source.to_path_buf(),
        });
    }

    if target.exists() {
        return Err(RelocationError::DestinationExists {
            path: source.to_path_buf(),
            destination: target,
        });
    }

    move_file(source, &target).map_err(|e| RelocationError::Io {
        path: source.to_path_buf(),
        destination: target.clone(),
        source: e,
    })?;

    Ok(MemberOutcome::Moved(target))
}

/// Rename, falling back to copy + verify + delete across filesystems
fn move_file(source: &Path, target: &Path) -> io::Result<()> {
    fs::rename(source, target)
        .or_else(|_| copy_then_remove(source, target, |path| fs::remove_file(path)))
}

/// Copy, check the size, then remove the source with `remove_source`.
///
/// On failure the target is deleted again, so the file is left in exactly
/// one place.
fn copy_then_remove<F>(source: &Path, target: &Path, remove_source: F) -> io::Result<()>
where
    F: FnOnce(&Path) -> io::Result<()>,
{
    let source_size = fs::metadata(source)?.len();
    fs::copy(source, target)?;

    let target_size = fs::metadata(target)?.len();
    if target_size != source_size {
        // Copy was incomplete, don't delete source
        let _ = fs::remove_file(target);
        return Err(io::Error::other(format!(
            "Copy verification failed: source {} bytes, destination {} bytes",
            source_size, target_size
        )));
    }

    if let Err(e) = remove_source(source) {
        let _ = fs::remove_file(target);
        return Err(e);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hasher::Fingerprint;
    use crate::events::{null_sender, EventChannel};
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn index_of(entries: &[(&str, &PathBuf)]) -> DuplicateIndex {
        let mut index = DuplicateIndex::new();
        for (fp, path) in entries {
            index.insert(Fingerprint::new(*fp), (*path).clone());
        }
        index
    }

    #[test]
    fn moves_every_member_of_duplicate_groups() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let a = write(src.path(), "a.png", b"same");
        let b = write(src.path(), "b.png", b"same");
        let c = write(src.path(), "c.png", b"other");

        let index = index_of(&[("h1", &a), ("h1", &b), ("h2", &c)]);
        let summary = RelocationExecutor::default().relocate(&index, dest.path(), &null_sender());

        assert_eq!(summary.duplicate_groups_found, 1);
        assert_eq!(summary.files_moved, 2);
        assert!(summary.failures.is_empty());
        assert!(!a.exists());
        assert!(!b.exists());
        assert!(c.exists());
        assert!(dest.path().join("a.png").exists());
        assert!(dest.path().join("b.png").exists());
    }

    #[test]
    fn keep_first_leaves_first_member_in_place() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let a = write(src.path(), "a.png", b"same");
        let b = write(src.path(), "b.png", b"same");
        let c = write(src.path(), "c.png", b"same");

        let index = index_of(&[("h", &a), ("h", &b), ("h", &c)]);
        let summary = RelocationExecutor::new(RelocationPolicy::KeepFirst).relocate(
            &index,
            dest.path(),
            &null_sender(),
        );

        assert_eq!(summary.files_moved, 2);
        assert!(a.exists());
        assert!(!b.exists());
        assert!(!c.exists());
    }

    #[test]
    fn second_pass_moves_nothing() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let a = write(src.path(), "a.png", b"same");
        let b = write(src.path(), "b.png", b"same");

        let index = index_of(&[("h", &a), ("h", &b)]);
        let executor = RelocationExecutor::default();

        let first = executor.relocate(&index, dest.path(), &null_sender());
        let second = executor.relocate(&index, dest.path(), &null_sender());

        assert_eq!(first.files_moved, 2);
        assert_eq!(second.files_moved, 0);
        assert_eq!(second.already_relocated, 2);
        assert!(second.failures.is_empty());
    }

    #[test]
    fn members_already_in_destination_are_untouched() {
        let dest = TempDir::new().unwrap();
        let src = TempDir::new().unwrap();
        let inside = write(dest.path(), "inside.png", b"same");
        let outside = write(src.path(), "outside.png", b"same");

        let index = index_of(&[("h", &inside), ("h", &outside)]);
        let summary = RelocationExecutor::default().relocate(&index, dest.path(), &null_sender());

        assert_eq!(summary.files_moved, 1);
        assert_eq!(summary.already_relocated, 1);
        assert!(inside.exists());
    }

    #[test]
    fn members_nested_under_destination_are_untouched() {
        let dest = TempDir::new().unwrap();
        let inbox = dest.path().join("inbox");
        fs::create_dir(&inbox).unwrap();
        let a = write(&inbox, "a.png", b"same");
        let b = write(&inbox, "b.png", b"same");

        let index = index_of(&[("h", &a), ("h", &b)]);
        let summary = RelocationExecutor::default().relocate(&index, dest.path(), &null_sender());

        assert_eq!(summary.files_moved, 0);
        assert_eq!(summary.already_relocated, 2);
        assert!(a.exists() && b.exists());
        assert!(!dest.path().join("a.png").exists());
    }

    #[test]
    fn failed_source_removal_leaves_no_copy_behind() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let source = write(src.path(), "a.png", b"payload");
        let target = dest.path().join("a.png");

        let result = copy_then_remove(&source, &target, |_| {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "source is locked"))
        });

        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::PermissionDenied);
        assert!(source.exists());
        assert!(!target.exists());
    }

    #[test]
    fn copy_fallback_moves_the_file() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let source = write(src.path(), "a.png", b"payload");
        let target = dest.path().join("a.png");

        copy_then_remove(&source, &target, |path| fs::remove_file(path)).unwrap();

        assert!(!source.exists());
        assert_eq!(fs::read(&target).unwrap(), b"payload");
    }

    #[test]
    fn existing_target_is_reported_not_overwritten() {
        let src = TempDir::new().unwrap();
        let other = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let a = write(src.path(), "a.png", b"same");
        let b = write(other.path(), "b.png", b"same");
        write(dest.path(), "a.png", b"previous");

        let index = index_of(&[("h", &a), ("h", &b)]);
        let (sender, receiver) = EventChannel::new();
        let summary = RelocationExecutor::default().relocate(&index, dest.path(), &sender);

        assert_eq!(summary.files_moved, 1);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].path, a);
        assert_eq!(summary.failures[0].group.as_str(), "h");
        assert!(a.exists());
        assert_eq!(fs::read(dest.path().join("a.png")).unwrap(), b"previous");

        drop(sender);
        let errors: Vec<_> = receiver
            .iter()
            .filter_map(|e| match e {
                Event::Error(err) => Some(err),
                _ => None,
            })
            .collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::RelocationFailure);
        assert_eq!(errors[0].file_path.as_deref(), Some(a.as_path()));
    }

    #[test]
    fn vanished_file_is_a_failure_and_batch_continues() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let a = write(src.path(), "a.png", b"same");
        let b = write(src.path(), "b.png", b"same");
        fs::remove_file(&a).unwrap();

        let index = index_of(&[("h", &a), ("h", &b)]);
        let summary = RelocationExecutor::default().relocate(&index, dest.path(), &null_sender());

        assert_eq!(summary.files_moved, 1);
        assert_eq!(summary.failures.len(), 1);
        assert!(dest.path().join("b.png").exists());
    }

    #[test]
    fn no_duplicates_means_nothing_moves() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let a = write(src.path(), "a.png", b"one");
        let b = write(src.path(), "b.png", b"two");

        let index = index_of(&[("h1", &a), ("h2", &b)]);
        let summary = RelocationExecutor::default().relocate(&index, dest.path(), &null_sender());

        assert_eq!(summary.duplicate_groups_found, 0);
        assert_eq!(summary.files_moved, 0);
        assert!(a.exists() && b.exists());
    }
}

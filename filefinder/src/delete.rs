/// Two-phase removal of search matches.
///
/// 1. **Confirm**: ask the [`Confirm`] collaborator; a "no" ends the run
///    with nothing removed.
/// 2. **Delete files**: remove every matched file. A failure is recorded and
///    the batch carries on.
/// 3. **Collect touched directories**: every directory that held a deleted
///    file, plus all of its ancestors below the filesystem root.
/// 4. **Sort deepest first**, so children are always pruned before parents.
/// 5. **Prune**: remove each candidate that is empty at the time it is
///    checked. Directories still holding anything, including files that were
///    never matched, are left alone.
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

use crate::errors::{FinderError, FinderResult};
use crate::results::SearchMatches;

pub const CONFIRM_PROMPT: &str = "Are you sure you want to delete these files?";

/// Yes/no decision made before anything is removed
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> FinderResult<bool>;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> FinderResult<bool> {
        Ok(self(prompt))
    }
}

/// What a deletion run did
#[derive(Debug, Default)]
pub struct DeletionReport {
    pub deleted_files: usize,
    pub deleted_dirs: usize,
    /// Per-item failures; none of them stopped the run
    pub failures: Vec<FinderError>,
    /// The confirmation was declined
    pub cancelled: bool,
}

impl DeletionReport {
    fn cancelled() -> Self {
        Self {
            cancelled: true,
            ..Self::default()
        }
    }
}

/// Deletes matched files and prunes the directories they leave empty
pub struct DeletionPlanner<C> {
    confirm: C,
}

impl<C: Confirm> DeletionPlanner<C> {
    pub fn new(confirm: C) -> Self {
        Self { confirm }
    }

    /// Deletes every file in `matches`, then prunes emptied directories
    pub fn delete(&mut self, matches: &SearchMatches) -> FinderResult<DeletionReport> {
        self.delete_files(matches.file_paths())
    }

    /// Same as [`delete`](Self::delete) for an explicit list of file paths
    pub fn delete_files(&mut self, files: Vec<PathBuf>) -> FinderResult<DeletionReport> {
        if files.is_empty() {
            debug!("Nothing to delete");
            return Ok(DeletionReport::default());
        }

        if !self.confirm.confirm(CONFIRM_PROMPT)? {
            info!("Deletion cancelled");
            return Ok(DeletionReport::cancelled());
        }

        let mut report = DeletionReport::default();

        let mut deleted = Vec::with_capacity(files.len());
        for file in files {
            match fs::remove_file(&file) {
                Ok(()) => {
                    debug!("Deleted {}", file.display());
                    deleted.push(file);
                }
                Err(e) => {
                    warn!("Error deleting {}: {}", file.display(), e);
                    report.failures.push(FinderError::deletion_failure(file, e));
                }
            }
        }
        report.deleted_files = deleted.len();

        for dir in prune_candidates(&deleted) {
            match prune_if_empty(&dir) {
                Ok(true) => {
                    debug!("Removed empty directory {}", dir.display());
                    report.deleted_dirs += 1;
                }
                Ok(false) => {}
                Err(e) => {
                    warn!("Error deleting directory {}: {}", dir.display(), e);
                    report.failures.push(FinderError::deletion_failure(dir, e));
                }
            }
        }

        info!(
            "Deleted {} files and {} directories ({} failures)",
            report.deleted_files,
            report.deleted_dirs,
            report.failures.len()
        );
        Ok(report)
    }
}

/// Directories that may have become empty after deleting `files`,
/// deepest first.
///
/// Contains each file's parent and every ancestor of it, stopping before the
/// filesystem root and before any `.`/`..` or empty relative prefix.
pub fn prune_candidates(files: &[PathBuf]) -> Vec<PathBuf> {
    let mut seen: HashSet<&Path> = HashSet::new();
    for file in files {
        let Some(parent) = file.parent() else {
            continue;
        };
        for dir in parent.ancestors() {
            if !matches!(dir.components().next_back(), Some(Component::Normal(_))) {
                break;
            }
            if !seen.insert(dir) {
                // Everything above was added by an earlier file
                break;
            }
        }
    }

    let mut candidates: Vec<PathBuf> = seen.into_iter().map(Path::to_path_buf).collect();
    candidates.sort_by(|a, b| {
        depth(b)
            .cmp(&depth(a))
            .then_with(|| b.as_os_str().len().cmp(&a.as_os_str().len()))
            .then_with(|| b.cmp(a))
    });
    candidates
}

fn depth(path: &Path) -> usize {
    path.components().count()
}

/// Removes `dir` if it has no entries. A directory that is already gone is
/// not an error.
fn prune_if_empty(dir: &Path) -> io::Result<bool> {
    let is_empty = match fs::read_dir(dir) {
        Ok(mut entries) => entries.next().is_none(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };
    if !is_empty {
        return Ok(false);
    }

    match fs::remove_dir(dir) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

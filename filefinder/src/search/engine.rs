use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::fs::{self, DirEntry};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace, warn};

use super::gate::ConcurrencyGate;
use crate::criteria::SearchCriteria;
use crate::errors::{FinderError, FinderResult};
use crate::metrics::TraversalMetrics;
use crate::results::{DetailedSink, GroupedSink, MatchSink, SearchOutcome};

/// Number of hardware threads, used when no thread count is configured
pub fn default_thread_count() -> NonZeroUsize {
    NonZeroUsize::new(num_cpus::get()).unwrap_or(NonZeroUsize::MIN)
}

/// Directory depth below which subtrees are walked with a work list on the
/// current worker instead of recursive parallel tasks
pub const PARALLEL_DEPTH_LIMIT: usize = 64;

/// Stack reserved for each worker thread. Work stealing can stack several
/// recursive walks on one worker.
const WORKER_STACK_SIZE: usize = 16 * 1024 * 1024;

/// Matches and totals collected below one directory
#[derive(Default)]
struct Partial<S> {
    sink: S,
    count: usize,
    bytes: u64,
}

impl<S: MatchSink> Partial<S> {
    fn record(&mut self, directory: &Path, path: PathBuf, file_name: &str, size: u64) {
        self.sink.record(directory, path, file_name, size);
        self.count += 1;
        self.bytes += size;
    }

    fn merge(mut self, other: Self) -> Self {
        self.sink.merge(other.sink);
        self.count += other.count;
        self.bytes += other.bytes;
        self
    }

    fn into_outcome(self) -> SearchOutcome {
        SearchOutcome {
            matches: self.sink.into_matches(),
            total_count: self.count,
            total_bytes: self.bytes,
        }
    }
}

enum EntryKind {
    Directory(PathBuf),
    File(PathBuf),
    Skipped,
}

/// Recursive, parallel directory walker.
///
/// Every entry of a directory becomes its own task on the engine's worker
/// pool. Subdirectories are expanded recursively and return their matches as
/// an owned value that the parent merges once all of its tasks are done, so
/// no result state is shared between tasks. Below [`PARALLEL_DEPTH_LIMIT`]
/// levels a subtree is finished on one worker with an explicit work list, so
/// stack use does not grow with tree depth.
///
/// Listing a directory requires a permit from the engine's
/// [`ConcurrencyGate`]. By default the gate has one permit per worker thread;
/// [`SearchEngine::with_gate_capacity`] sets a smaller limit on how many
/// directories are read at the same time.
#[derive(Debug)]
pub struct SearchEngine {
    pool: ThreadPool,
    gate: ConcurrencyGate,
    metrics: TraversalMetrics,
}

impl SearchEngine {
    /// Creates an engine with `thread_count` workers and gate permits
    pub fn new(thread_count: NonZeroUsize) -> FinderResult<Self> {
        Self::with_gate_capacity(thread_count, thread_count)
    }

    /// Creates an engine with `thread_count` workers that lists at most
    /// `gate_capacity` directories at once
    pub fn with_gate_capacity(
        thread_count: NonZeroUsize,
        gate_capacity: NonZeroUsize,
    ) -> FinderResult<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(thread_count.get())
            .stack_size(WORKER_STACK_SIZE)
            .thread_name(|i| format!("filefinder-{}", i))
            .build()
            .map_err(|e| FinderError::config_error(format!("failed to start workers: {}", e)))?;

        Ok(Self {
            pool,
            gate: ConcurrencyGate::new(gate_capacity),
            metrics: TraversalMetrics::new(),
        })
    }

    /// Creates an engine sized to the available hardware threads
    pub fn with_default_threads() -> FinderResult<Self> {
        Self::new(default_thread_count())
    }

    pub fn thread_count(&self) -> usize {
        self.pool.current_num_threads()
    }

    pub fn gate(&self) -> &ConcurrencyGate {
        &self.gate
    }

    /// Counters for the most recent search
    pub fn metrics(&self) -> &TraversalMetrics {
        &self.metrics
    }

    /// Searches `criteria.root_directory` for matching files.
    ///
    /// Fails only if the root itself cannot be listed. Subdirectories that
    /// cannot be read are skipped and contribute no matches.
    pub fn search(&self, criteria: &SearchCriteria) -> FinderResult<SearchOutcome> {
        info!(
            "Starting search in {} (type: {}, name: {:?}, size: {:?} {} ±{})",
            criteria.root_directory.display(),
            criteria.file_type,
            criteria.name_filter,
            criteria.size_filter,
            criteria.operator.symbol(),
            criteria.tolerance
        );
        self.metrics.reset();
        self.gate.reset_peak();

        let outcome = if criteria.detailed {
            self.walk::<DetailedSink>(criteria)?
        } else {
            self.walk::<GroupedSink>(criteria)?
        };

        self.metrics.log_stats();
        info!(
            "Search complete. Found {} files ({} bytes)",
            outcome.total_count, outcome.total_bytes
        );
        Ok(outcome)
    }

    fn walk<S: MatchSink>(&self, criteria: &SearchCriteria) -> FinderResult<SearchOutcome> {
        let partial = self
            .pool
            .install(|| self.expand::<S>(&criteria.root_directory, criteria, 0))?;
        Ok(partial.into_outcome())
    }

    fn expand<S: MatchSink>(
        &self,
        directory: &Path,
        criteria: &SearchCriteria,
        depth: usize,
    ) -> FinderResult<Partial<S>> {
        if depth >= PARALLEL_DEPTH_LIMIT {
            return self.expand_iteratively(directory, criteria);
        }

        let entries = self.list_directory(directory)?;

        Ok(entries
            .into_par_iter()
            .map(|entry| self.visit::<S>(directory, entry, criteria, depth))
            .reduce(Partial::default, Partial::merge))
    }

    /// Walks a whole subtree on the current worker. Only a failure to list
    /// `directory` itself is returned.
    fn expand_iteratively<S: MatchSink>(
        &self,
        directory: &Path,
        criteria: &SearchCriteria,
    ) -> FinderResult<Partial<S>> {
        let mut partial = Partial::default();
        let mut pending = Vec::new();

        let entries = self.list_directory(directory)?;
        self.collect_entries(directory, entries, criteria, &mut partial, &mut pending);

        while let Some(next) = pending.pop() {
            match self.list_directory(&next) {
                Ok(entries) => {
                    self.collect_entries(&next, entries, criteria, &mut partial, &mut pending)
                }
                Err(e) => self.skip_subtree(&e),
            }
        }
        Ok(partial)
    }

    fn collect_entries<S: MatchSink>(
        &self,
        directory: &Path,
        entries: Vec<DirEntry>,
        criteria: &SearchCriteria,
        partial: &mut Partial<S>,
        pending: &mut Vec<PathBuf>,
    ) {
        for entry in entries {
            match self.classify(&entry) {
                EntryKind::Directory(path) => pending.push(path),
                EntryKind::File(path) => {
                    self.evaluate_file(directory, path, &entry, criteria, partial)
                }
                EntryKind::Skipped => {}
            }
        }
    }

    fn list_directory(&self, directory: &Path) -> FinderResult<Vec<DirEntry>> {
        let _permit = self.gate.acquire();

        let entries: Vec<DirEntry> = fs::read_dir(directory)
            .map_err(|e| FinderError::directory_unreadable(directory, e))?
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    debug!("Skipping entry in {}: {}", directory.display(), e);
                    self.metrics.record_skipped_entry();
                    None
                }
            })
            .collect();

        self.metrics.record_directory(entries.len());
        Ok(entries)
    }

    fn classify(&self, entry: &DirEntry) -> EntryKind {
        let path = entry.path();
        match entry.file_type() {
            // Symlinked directories are not followed
            Ok(file_type) if file_type.is_dir() => EntryKind::Directory(path),
            Ok(_) => EntryKind::File(path),
            Err(e) => {
                debug!("Cannot determine type of {}: {}", path.display(), e);
                self.metrics.record_skipped_entry();
                EntryKind::Skipped
            }
        }
    }

    fn visit<S: MatchSink>(
        &self,
        directory: &Path,
        entry: DirEntry,
        criteria: &SearchCriteria,
        depth: usize,
    ) -> Partial<S> {
        let mut partial = Partial::default();
        match self.classify(&entry) {
            EntryKind::Directory(path) => match self.expand::<S>(&path, criteria, depth + 1) {
                Ok(subtree) => return subtree,
                Err(e) => self.skip_subtree(&e),
            },
            EntryKind::File(path) => {
                self.evaluate_file(directory, path, &entry, criteria, &mut partial)
            }
            EntryKind::Skipped => {}
        }
        partial
    }

    fn skip_subtree(&self, error: &FinderError) {
        warn!("Skipping directory: {}", error);
        self.metrics.record_skipped_subtree();
    }

    fn evaluate_file<S: MatchSink>(
        &self,
        directory: &Path,
        path: PathBuf,
        entry: &DirEntry,
        criteria: &SearchCriteria,
        partial: &mut Partial<S>,
    ) {
        self.metrics.record_file();

        let file_name = entry.file_name().to_string_lossy().into_owned();
        if !criteria.matches_type_and_name(&path, &file_name) {
            return;
        }

        let size = match entry.metadata() {
            Ok(metadata) => metadata.len(),
            Err(e) => {
                debug!("Cannot stat {}: {}", path.display(), e);
                self.metrics.record_skipped_entry();
                return;
            }
        };

        if !criteria.matches_size(size) {
            return;
        }

        trace!("Matched {} ({} bytes)", path.display(), size);
        self.metrics.record_match(size);
        partial.record(directory, path, &file_name, size);
    }
}

/// Runs a search on a fresh engine sized to the available hardware threads
pub fn search(criteria: &SearchCriteria) -> FinderResult<SearchOutcome> {
    SearchEngine::with_default_threads()?.search(criteria)
}

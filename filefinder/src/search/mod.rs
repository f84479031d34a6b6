/// This module implements the concurrent directory walk.
///
/// # Parallel recursion
///
/// Each directory's entries are fanned out as Rayon tasks. A subdirectory
/// task recurses and hands back everything it found as an owned value, and
/// the parent folds those values together with `reduce`:
/// ```rust,ignore
/// entries
///     .into_par_iter()
///     .map(|entry| visit(entry))          // file check or recursive expand
///     .reduce(Partial::default, Partial::merge)
/// ```
/// Because results flow back up the call tree instead of being pushed into a
/// shared map, there is no result lock and totals are exact no matter how the
/// tasks interleave.
///
/// # Depth
///
/// Parallel recursion stops [`PARALLEL_DEPTH_LIMIT`] levels below the root.
/// Deeper subtrees are finished on a single worker from an explicit work
/// list, so very deep trees do not exhaust the worker stacks.
///
/// # Bounded expansion
///
/// The engine owns both its worker pool and a [`ConcurrencyGate`]. Reading a
/// directory listing needs a permit and the permit is released as soon as the
/// listing is collected; children are then processed without holding it, so
/// a deep tree cannot exhaust the permits with waiting parents.
///
/// With [`SearchEngine::new`] the gate has one permit per worker thread.
/// Listing never yields to the pool, so in that case the pool size is the
/// effective bound and the gate never blocks. Use
/// [`SearchEngine::with_gate_capacity`] to read fewer directories at once
/// than there are workers.
///
/// # Error Handling
///
/// Only a failure to list the root directory is returned to the caller:
/// ```rust,ignore
/// match search(&criteria) {
///     Ok(outcome) => // Unreadable subdirectories were skipped and logged
///     Err(FinderError::DirectoryUnreadable { path, .. }) => // root failed
///     Err(e) => // worker pool could not start
/// }
/// ```
pub mod engine;
pub mod gate;

pub use engine::{default_thread_count, search, SearchEngine, PARALLEL_DEPTH_LIMIT};
pub use gate::{ConcurrencyGate, GatePermit};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Tracks what a traversal did
#[derive(Debug, Clone, Default)]
pub struct TraversalMetrics {
    directories_scanned: Arc<AtomicU64>,
    files_examined: Arc<AtomicU64>,
    files_matched: Arc<AtomicU64>,
    bytes_matched: Arc<AtomicU64>,

    // Failures that were skipped instead of aborting the search
    entries_skipped: Arc<AtomicU64>,
    subtrees_skipped: Arc<AtomicU64>,
}

impl TraversalMetrics {
    /// Creates a new TraversalMetrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a directory whose entries were listed
    pub fn record_directory(&self, entries: usize) {
        let total = self.directories_scanned.fetch_add(1, Ordering::Relaxed) + 1;
        debug!("Listed {} entries, {} directories so far", entries, total);
    }

    /// Records a file that was checked against the criteria
    pub fn record_file(&self) {
        self.files_examined.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a file that matched
    pub fn record_match(&self, bytes: u64) {
        self.files_matched.fetch_add(1, Ordering::Relaxed);
        self.bytes_matched.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Records a single entry that could not be inspected
    pub fn record_skipped_entry(&self) {
        self.entries_skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a subdirectory whose listing failed
    pub fn record_skipped_subtree(&self) {
        self.subtrees_skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// Clears all counters
    pub fn reset(&self) {
        for counter in [
            &self.directories_scanned,
            &self.files_examined,
            &self.files_matched,
            &self.bytes_matched,
            &self.entries_skipped,
            &self.subtrees_skipped,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }

    /// Gets a snapshot of the counters
    pub fn get_stats(&self) -> TraversalStats {
        TraversalStats {
            directories_scanned: self.directories_scanned.load(Ordering::Relaxed),
            files_examined: self.files_examined.load(Ordering::Relaxed),
            files_matched: self.files_matched.load(Ordering::Relaxed),
            bytes_matched: self.bytes_matched.load(Ordering::Relaxed),
            entries_skipped: self.entries_skipped.load(Ordering::Relaxed),
            subtrees_skipped: self.subtrees_skipped.load(Ordering::Relaxed),
        }
    }

    /// Logs current traversal statistics
    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            "Traversal stats: {} directories scanned, {} files examined, {} matched ({} bytes)",
            stats.directories_scanned,
            stats.files_examined,
            stats.files_matched,
            stats.bytes_matched
        );
        if stats.entries_skipped > 0 || stats.subtrees_skipped > 0 {
            info!(
                "Skipped {} unreadable entries and {} unreadable directories",
                stats.entries_skipped, stats.subtrees_skipped
            );
        }
    }
}

/// Snapshot of traversal counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TraversalStats {
    pub directories_scanned: u64,
    pub files_examined: u64,
    pub files_matched: u64,
    pub bytes_matched: u64,
    pub entries_skipped: u64,
    pub subtrees_skipped: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let metrics = TraversalMetrics::new();
        metrics.record_directory(3);
        metrics.record_directory(0);
        metrics.record_file();
        metrics.record_file();
        metrics.record_match(100);
        metrics.record_skipped_entry();
        metrics.record_skipped_subtree();

        let stats = metrics.get_stats();
        assert_eq!(stats.directories_scanned, 2);
        assert_eq!(stats.files_examined, 2);
        assert_eq!(stats.files_matched, 1);
        assert_eq!(stats.bytes_matched, 100);
        assert_eq!(stats.entries_skipped, 1);
        assert_eq!(stats.subtrees_skipped, 1);
    }

    #[test]
    fn test_clones_share_counters() {
        let metrics = TraversalMetrics::new();
        let clone = metrics.clone();
        clone.record_match(5);
        assert_eq!(metrics.get_stats().files_matched, 1);

        metrics.reset();
        assert_eq!(clone.get_stats(), TraversalStats::default());
    }
}

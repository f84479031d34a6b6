use std::path::{Path, PathBuf};

use crate::filters::{is_allowed, name_matches, FileType};
use crate::size::{size_matches, SizeOperator};

/// Default relative slack applied to the target size
pub const DEFAULT_TOLERANCE: f64 = 0.05;

/// Validated, immutable description of what a search looks for.
///
/// Built once per run, usually through
/// [`FinderConfig::to_criteria`](crate::config::FinderConfig::to_criteria).
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCriteria {
    /// Directory the search starts from
    pub root_directory: PathBuf,
    /// Type category a file's extension must belong to
    pub file_type: FileType,
    /// Case-insensitive substring the file name must contain
    pub name_filter: Option<String>,
    /// Target size in bytes; `None` disables the size check
    pub size_filter: Option<u64>,
    /// Comparison applied against `size_filter`
    pub operator: SizeOperator,
    /// Relative tolerance, e.g. 0.05 for 5%
    pub tolerance: f64,
    /// Produce per-file detail records instead of a directory grouping
    pub detailed: bool,
}

impl SearchCriteria {
    /// Criteria matching every file below `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root_directory: root.into(),
            file_type: FileType::Any,
            name_filter: None,
            size_filter: None,
            operator: SizeOperator::EqualTo,
            tolerance: DEFAULT_TOLERANCE,
            detailed: false,
        }
    }

    pub fn with_file_type(mut self, file_type: FileType) -> Self {
        self.file_type = file_type;
        self
    }

    pub fn with_name_filter(mut self, filter: impl Into<String>) -> Self {
        self.name_filter = Some(filter.into());
        self
    }

    pub fn with_size(mut self, operator: SizeOperator, bytes: u64) -> Self {
        self.operator = operator;
        self.size_filter = Some(bytes);
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn detailed(mut self, detailed: bool) -> Self {
        self.detailed = detailed;
        self
    }

    /// Type and name checks, which need no metadata
    pub fn matches_type_and_name(&self, path: &Path, file_name: &str) -> bool {
        is_allowed(self.file_type, path) && name_matches(self.name_filter.as_deref(), file_name)
    }

    /// Size check; always true when no size filter is set
    pub fn matches_size(&self, size: u64) -> bool {
        match self.size_filter {
            None => true,
            Some(target) => size_matches(self.operator, target, self.tolerance, size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_everything() {
        let criteria = SearchCriteria::new(".");
        assert!(criteria.matches_type_and_name(Path::new("x/file"), "file"));
        assert!(criteria.matches_size(0));
        assert!(criteria.matches_size(u64::MAX));
        assert!(!criteria.detailed);
    }

    #[test]
    fn test_combined_filters() {
        let criteria = SearchCriteria::new("root")
            .with_file_type(FileType::Video)
            .with_name_filter("Trip")
            .with_size(SizeOperator::GreaterThan, 1000)
            .with_tolerance(0.0);

        assert!(criteria.matches_type_and_name(Path::new("root/my_trip.mp4"), "my_trip.mp4"));
        assert!(!criteria.matches_type_and_name(Path::new("root/my_trip.pdf"), "my_trip.pdf"));
        assert!(!criteria.matches_type_and_name(Path::new("root/other.mp4"), "other.mp4"));
        assert!(criteria.matches_size(1001));
        assert!(!criteria.matches_size(1000));
    }
}

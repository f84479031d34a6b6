/// Search result types.
///
/// A search produces exactly one representation of its matches, chosen once
/// from [`SearchCriteria::detailed`](crate::criteria::SearchCriteria):
///
/// - **Grouped**: directory → full paths of the matching files in it
/// - **Detailed**: a flat list of `(directory, file name, size)` records
///
/// While the tree is walked, each directory builds its own collector value
/// (a [`MatchSink`]) and hands it back to its parent, which merges it. The
/// collector type is a generic parameter of the walk, so a subtree can never
/// produce a different representation than its parent.
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Directory → matching file paths inside it
pub type GroupedMatches = HashMap<PathBuf, Vec<PathBuf>>;

/// A single matching file in detailed mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailedEntry {
    /// The directory that directly contains the file
    pub directory: PathBuf,
    /// The file name within `directory`
    pub file_name: String,
    /// Size of the file in bytes
    pub size_bytes: u64,
    /// Full path as seen during the walk
    #[serde(skip)]
    pub path: PathBuf,
}

/// Number of matches found in one directory
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct DirectorySummary {
    pub directory: PathBuf,
    pub count: usize,
}

/// The matches of a completed search, in the representation it was run with
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "mode", content = "entries", rename_all = "lowercase")]
pub enum SearchMatches {
    Grouped(GroupedMatches),
    Detailed(Vec<DetailedEntry>),
}

impl SearchMatches {
    /// Number of matched files
    pub fn len(&self) -> usize {
        match self {
            SearchMatches::Grouped(groups) => groups.values().map(Vec::len).sum(),
            SearchMatches::Detailed(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Full paths of every matched file
    pub fn file_paths(&self) -> Vec<PathBuf> {
        match self {
            SearchMatches::Grouped(groups) => groups.values().flatten().cloned().collect(),
            SearchMatches::Detailed(entries) => entries.iter().map(|e| e.path.clone()).collect(),
        }
    }

    /// Per-directory counts; available for either representation
    pub fn summaries(&self) -> Vec<DirectorySummary> {
        match self {
            SearchMatches::Grouped(groups) => summarize(groups),
            SearchMatches::Detailed(entries) => {
                let mut counts: HashMap<&Path, usize> = HashMap::new();
                for entry in entries {
                    *counts.entry(entry.directory.as_path()).or_default() += 1;
                }
                counts
                    .into_iter()
                    .map(|(directory, count)| DirectorySummary {
                        directory: directory.to_path_buf(),
                        count,
                    })
                    .collect()
            }
        }
    }
}

/// The complete result of a search
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub matches: SearchMatches,
    /// Total number of matching files
    pub total_count: usize,
    /// Combined size of the matching files in bytes
    pub total_bytes: u64,
}

impl SearchOutcome {
    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }
}

/// Converts a grouping into one summary per directory.
/// Order follows the map's iteration order.
pub fn summarize(grouped: &GroupedMatches) -> Vec<DirectorySummary> {
    grouped
        .iter()
        .map(|(directory, files)| DirectorySummary {
            directory: directory.clone(),
            count: files.len(),
        })
        .collect()
}

/// Collector a directory walk records matches into
pub trait MatchSink: Default + Send {
    /// Records one matching file found directly inside `directory`
    fn record(&mut self, directory: &Path, path: PathBuf, file_name: &str, size: u64);

    /// Absorbs the matches collected by another walk
    fn merge(&mut self, other: Self);

    fn into_matches(self) -> SearchMatches;
}

/// Collects matches grouped by directory
#[derive(Debug, Default)]
pub struct GroupedSink(GroupedMatches);

impl MatchSink for GroupedSink {
    fn record(&mut self, directory: &Path, path: PathBuf, _file_name: &str, _size: u64) {
        self.0.entry(directory.to_path_buf()).or_default().push(path);
    }

    fn merge(&mut self, other: Self) {
        for (directory, files) in other.0 {
            self.0.entry(directory).or_default().extend(files);
        }
    }

    fn into_matches(self) -> SearchMatches {
        SearchMatches::Grouped(self.0)
    }
}

/// Collects one detail record per match
#[derive(Debug, Default)]
pub struct DetailedSink(Vec<DetailedEntry>);

impl MatchSink for DetailedSink {
    fn record(&mut self, directory: &Path, path: PathBuf, file_name: &str, size: u64) {
        self.0.push(DetailedEntry {
            directory: directory.to_path_buf(),
            file_name: file_name.to_string(),
            size_bytes: size,
            path,
        });
    }

    fn merge(&mut self, other: Self) {
        self.0.extend(other.0);
    }

    fn into_matches(self) -> SearchMatches {
        SearchMatches::Detailed(self.0)
    }
}

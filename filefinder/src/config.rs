use config::{Config as ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::criteria::{SearchCriteria, DEFAULT_TOLERANCE};
use crate::errors::{FinderError, FinderResult};
use crate::filters::FileType;
use crate::search::default_thread_count;
use crate::size::{parse_size_filter, SizeOperator};

/// Prefix of environment variables read as configuration,
/// e.g. `FILE_FINDER_TOLERANCE_SIZE=0.1`
pub const ENV_PREFIX: &str = "FILE_FINDER";

/// Raw run configuration, as read from files, the environment and flags.
///
/// # Configuration Locations
///
/// Sources are layered, later ones overriding earlier ones:
/// 1. Global `$HOME/.config/filefinder/config.yaml`
/// 2. Local `.filefinder.yaml` in the current directory
/// 3. A file given with `--config`
/// 4. `FILE_FINDER_*` environment variables
/// 5. Command-line flags (see [`FinderConfig::merge_with_cli`])
///
/// # Configuration Format
///
/// ```yaml
/// root_path: "~/Videos"
/// file_type_filter: "Video"      # Any, Video, Image, Archive, Documents
/// operator_type: "gte"           # EqualTo, gt, >=, less than, ...
/// file_size_filter: "700 MB"
/// tolerance_size: 0.05
/// file_name_filter: "holiday"
/// display_detailed_results: true
/// remove_files: false
/// thread_count: 4
/// log_level: "info"
/// ```
///
/// Filter values stay strings here; [`FinderConfig::to_criteria`] validates
/// them, so a bad value is reported once, before any traversal starts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinderConfig {
    /// Directory to search
    #[serde(default = "default_root_path")]
    pub root_path: PathBuf,

    /// File type category (Any, Video, Image, Archive, Documents)
    #[serde(default = "default_file_type_filter")]
    pub file_type_filter: String,

    /// Size comparison operator
    #[serde(default = "default_operator_type")]
    pub operator_type: String,

    /// Target size such as "1 MB"; no size check when absent
    #[serde(default)]
    pub file_size_filter: Option<String>,

    /// Relative tolerance around the target size
    #[serde(default = "default_tolerance_size")]
    pub tolerance_size: f64,

    /// Case-insensitive substring the file name must contain
    #[serde(default)]
    pub file_name_filter: Option<String>,

    /// Show one row per file instead of per-directory counts
    #[serde(default)]
    pub display_detailed_results: bool,

    /// Delete the matches after displaying them
    #[serde(default)]
    pub remove_files: bool,

    /// Clear the screen and show the banner first
    #[serde(default)]
    pub display_app_banner: bool,

    /// Worker threads and concurrent directory expansions.
    /// Defaults to the number of CPU cores.
    #[serde(default = "default_thread_count")]
    pub thread_count: NonZeroUsize,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Values supplied on the command line; `None`/`false` means "not given"
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub root_path: Option<PathBuf>,
    pub file_type_filter: Option<String>,
    pub operator_type: Option<String>,
    pub file_size_filter: Option<String>,
    pub tolerance_size: Option<f64>,
    pub file_name_filter: Option<String>,
    pub display_detailed_results: bool,
    pub remove_files: bool,
    pub display_app_banner: bool,
    pub thread_count: Option<NonZeroUsize>,
    pub log_level: Option<String>,
}

fn default_root_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_file_type_filter() -> String {
    FileType::Any.to_string()
}

fn default_operator_type() -> String {
    SizeOperator::EqualTo.to_string()
}

fn default_tolerance_size() -> f64 {
    DEFAULT_TOLERANCE
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            root_path: default_root_path(),
            file_type_filter: default_file_type_filter(),
            operator_type: default_operator_type(),
            file_size_filter: None,
            tolerance_size: default_tolerance_size(),
            file_name_filter: None,
            display_detailed_results: false,
            remove_files: false,
            display_app_banner: false,
            thread_count: default_thread_count(),
            log_level: default_log_level(),
        }
    }
}

impl FinderConfig {
    /// Loads configuration from the default locations
    pub fn load() -> FinderResult<Self> {
        Self::load_from(None)
    }

    /// Loads configuration from the default locations plus an explicit file,
    /// which must exist
    pub fn load_from(config_path: Option<&Path>) -> FinderResult<Self> {
        let mut builder = ConfigBuilder::builder();

        let default_files = [
            // Global config
            dirs::config_dir().map(|p| p.join("filefinder/config.yaml")),
            // Local config
            Some(PathBuf::from(".filefinder.yaml")),
        ];
        for path in default_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        if let Some(path) = config_path {
            if !path.exists() {
                return Err(FinderError::config_error(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true));

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Merges CLI arguments with configuration values
    pub fn merge_with_cli(mut self, cli: ConfigOverrides) -> Self {
        // CLI values take precedence over config file values
        if let Some(root) = cli.root_path {
            self.root_path = root;
        }
        if let Some(file_type) = cli.file_type_filter {
            self.file_type_filter = file_type;
        }
        if let Some(operator) = cli.operator_type {
            self.operator_type = operator;
        }
        if cli.file_size_filter.is_some() {
            self.file_size_filter = cli.file_size_filter;
        }
        if let Some(tolerance) = cli.tolerance_size {
            self.tolerance_size = tolerance;
        }
        if cli.file_name_filter.is_some() {
            self.file_name_filter = cli.file_name_filter;
        }
        if cli.display_detailed_results {
            self.display_detailed_results = true;
        }
        if cli.remove_files {
            self.remove_files = true;
        }
        if cli.display_app_banner {
            self.display_app_banner = true;
        }
        if let Some(threads) = cli.thread_count {
            self.thread_count = threads;
        }
        if let Some(level) = cli.log_level {
            self.log_level = level;
        }
        self
    }

    /// Validates the filter values and builds the search criteria
    pub fn to_criteria(&self) -> FinderResult<SearchCriteria> {
        let file_type: FileType = self.file_type_filter.parse()?;
        let operator: SizeOperator = self.operator_type.parse()?;

        if !self.tolerance_size.is_finite() || self.tolerance_size < 0.0 {
            return Err(FinderError::config_error(format!(
                "tolerance must be a non-negative number, got {}",
                self.tolerance_size
            )));
        }

        let size_filter = match &self.file_size_filter {
            Some(size) => parse_size_filter(size)?,
            None => None,
        };

        let name_filter = self
            .file_name_filter
            .as_ref()
            .filter(|name| !name.is_empty())
            .cloned();

        Ok(SearchCriteria {
            root_directory: self.root_path.clone(),
            file_type,
            name_filter,
            size_filter,
            operator,
            tolerance: self.tolerance_size,
            detailed: self.display_detailed_results,
        })
    }
}

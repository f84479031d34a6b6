pub mod config;
pub mod criteria;
pub mod delete;
pub mod errors;
pub mod filters;
pub mod metrics;
pub mod results;
pub mod search;
pub mod size;

pub use config::{ConfigOverrides, FinderConfig};
pub use criteria::SearchCriteria;
pub use delete::{Confirm, DeletionPlanner, DeletionReport};
pub use errors::{FinderError, FinderResult};
pub use filters::FileType;
pub use results::{DetailedEntry, DirectorySummary, SearchMatches, SearchOutcome};
pub use search::{search, SearchEngine};
pub use size::SizeOperator;

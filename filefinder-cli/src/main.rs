mod prompt;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use filefinder::{ConfigOverrides, DeletionPlanner, FinderConfig, SearchEngine};
use prompt::InteractiveConfirm;
use crossterm::tty::IsTty;
use std::{io, num::NonZeroUsize, path::PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "filefinder", author, version, about, long_about = None)]
struct Cli {
    /// Directory to search
    root_directory: PathBuf,

    /// Clear the screen and display the application banner
    #[arg(short = 'b', long = "display-app-banner")]
    display_app_banner: bool,

    /// Display one row per file instead of a count per directory
    #[arg(short = 'd', long = "display-detailed-results")]
    display_detailed_results: bool,

    /// Delete matched files after confirmation, then remove emptied directories
    #[arg(short = 'r', long = "remove-files")]
    remove_files: bool,

    /// Tolerance fraction for size comparisons [default: 0.05]
    #[arg(short = 'l', long = "tolerance-size")]
    tolerance_size: Option<f64>,

    /// Case-insensitive substring the file name must contain
    #[arg(short = 'f', long = "file-name-filter")]
    file_name_filter: Option<String>,

    /// Target size, e.g. "500KB", "1.5 MiB", "2GB"
    #[arg(short = 's', long = "file-size-filter")]
    file_size_filter: Option<String>,

    /// Any, Video, Image, Archive or Documents [default: Any]
    #[arg(short = 't', long = "file-type-filter")]
    file_type_filter: Option<String>,

    /// EqualTo, GreaterThan, GreaterThanOrEqual, LessThan or LessThanOrEqual [default: EqualTo]
    #[arg(short = 'o', long = "operator-type")]
    operator_type: Option<String>,

    /// Number of worker threads
    #[arg(short = 'j', long)]
    threads: Option<NonZeroUsize>,

    /// Path to a YAML config file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Log level used when RUST_LOG is unset [default: warn]
    #[arg(long)]
    log_level: Option<String>,

    /// Print results as JSON instead of a table
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            root_path: Some(self.root_directory.clone()),
            file_type_filter: self.file_type_filter.clone(),
            operator_type: self.operator_type.clone(),
            file_size_filter: self.file_size_filter.clone(),
            tolerance_size: self.tolerance_size,
            file_name_filter: self.file_name_filter.clone(),
            display_detailed_results: self.display_detailed_results,
            remove_files: self.remove_files,
            display_app_banner: self.display_app_banner,
            thread_count: self.threads,
            log_level: self.log_level.clone(),
        }
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = FinderConfig::load_from(cli.config.as_deref())
        .context("failed to load configuration")?
        .merge_with_cli(cli.overrides());
    init_tracing(&config.log_level);

    if config.display_app_banner {
        render::print_banner().context("failed to draw banner")?;
    }

    let criteria = config.to_criteria()?;
    tracing::debug!(?criteria, threads = config.thread_count.get(), "starting search");
    let engine = SearchEngine::new(config.thread_count)?;

    let spinner = render::spinner();
    render::start_search_spinner(&spinner);
    let result = engine.search(&criteria);
    spinner.finish_and_clear();
    let outcome = result.with_context(|| {
        format!(
            "error finding files in {}",
            criteria.root_directory.display()
        )
    })?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        render::print_outcome(&outcome, io::stdout().is_tty());
    }

    if config.remove_files && !outcome.is_empty() {
        // With --json, stdout carries only the JSON document
        let progress = render::spinner();
        let confirm = InteractiveConfirm::new(&progress).prompt_on_stderr(cli.json);
        let report = DeletionPlanner::new(confirm).delete(&outcome.matches);
        progress.finish_and_clear();

        let report = report.context("deletion aborted")?;
        if cli.json {
            render::write_deletion_report(&report, &mut io::stderr())?;
        } else {
            render::write_deletion_report(&report, &mut io::stdout())?;
        }
    }

    Ok(())
}

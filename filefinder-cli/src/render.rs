use colored::Colorize;
use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};
use filefinder::{DeletionReport, SearchMatches, SearchOutcome};
use humansize::{format_size, WINDOWS};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Clears the terminal and prints the application banner
pub fn print_banner() -> io::Result<()> {
    execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0))?;
    println!(
        "{} {}",
        "File-Finder".cyan().bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!("{}\n", "Find files by type, name and size".dimmed());
    Ok(())
}

/// A spinner on stderr; hidden automatically when stderr is not a terminal.
/// Nothing is drawn until a message is set.
pub fn spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner
}

/// Starts the spinner shown while the tree is walked
pub fn start_search_spinner(spinner: &ProgressBar) {
    spinner.set_message("Searching...");
    spinner.enable_steady_tick(Duration::from_millis(100));
}

/// Starts the spinner shown while files are removed
pub fn start_deletion_spinner(spinner: &ProgressBar) {
    spinner.set_message("Deleting files and directories...");
    spinner.enable_steady_tick(Duration::from_millis(100));
}

/// One table cell; linked cells are highlighted and, when enabled, become
/// clickable terminal hyperlinks
struct Cell {
    text: String,
    link: Option<PathBuf>,
}

impl Cell {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            link: None,
        }
    }

    fn linked(text: impl Into<String>, target: impl Into<PathBuf>) -> Self {
        Self {
            text: text.into(),
            link: Some(target.into()),
        }
    }

    fn width(&self) -> usize {
        self.text.chars().count()
    }

    fn render(&self, width: usize, hyperlinks: bool) -> String {
        let padding = " ".repeat(width.saturating_sub(self.width()));
        match &self.link {
            None => format!("{}{}", self.text, padding),
            Some(target) => {
                let styled = self.text.green().to_string();
                if hyperlinks {
                    format!("{}{}", hyperlink(target, &styled), padding)
                } else {
                    format!("{}{}", styled, padding)
                }
            }
        }
    }
}

/// Wraps `text` in an OSC 8 escape sequence pointing at `target`
pub fn hyperlink(target: &Path, text: &str) -> String {
    format!("\x1b]8;;{}\x1b\\{}\x1b]8;;\x1b\\", file_url(target), text)
}

fn file_url(target: &Path) -> String {
    let absolute = fs::canonicalize(target).unwrap_or_else(|_| target.to_path_buf());
    let path = absolute.to_string_lossy().replace('\\', "/");
    if path.starts_with('/') {
        format!("file://{}", path)
    } else {
        format!("file:///{}", path)
    }
}

/// Prints search results as a table. `hyperlinks` turns directory and file
/// cells into terminal links.
pub fn print_outcome(outcome: &SearchOutcome, hyperlinks: bool) {
    if outcome.is_empty() {
        println!("{} results found matching criteria", outcome.total_count);
        return;
    }

    match &outcome.matches {
        SearchMatches::Grouped(_) => {
            let mut summaries = outcome.matches.summaries();
            summaries.sort();
            let rows: Vec<Vec<Cell>> = summaries
                .iter()
                .map(|s| {
                    vec![
                        Cell::linked(s.directory.display().to_string(), &s.directory),
                        Cell::plain(s.count.to_string()),
                    ]
                })
                .collect();
            print_table(
                &["Directory", "Count"],
                &rows,
                &["Total".to_string(), outcome.total_count.to_string()],
                hyperlinks,
            );
        }
        SearchMatches::Detailed(entries) => {
            let mut entries: Vec<_> = entries.iter().collect();
            entries.sort_by(|a, b| {
                a.directory
                    .cmp(&b.directory)
                    .then_with(|| a.file_name.cmp(&b.file_name))
            });
            let rows: Vec<Vec<Cell>> = entries
                .iter()
                .map(|e| {
                    vec![
                        Cell::linked(e.directory.display().to_string(), &e.directory),
                        Cell::linked(e.file_name.clone(), e.directory.join(&e.file_name)),
                        Cell::plain(format_size(e.size_bytes, WINDOWS)),
                    ]
                })
                .collect();
            print_table(
                &["Directory", "FileName", "FileSize"],
                &rows,
                &[
                    "Total".to_string(),
                    outcome.total_count.to_string(),
                    format_size(outcome.total_bytes, WINDOWS),
                ],
                hyperlinks,
            );
        }
    }
}

fn print_table(header: &[&str], rows: &[Vec<Cell>], footer: &[String], hyperlinks: bool) {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.width());
        }
    }
    for (width, cell) in widths.iter_mut().zip(footer) {
        *width = (*width).max(cell.chars().count());
    }

    let pad = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join(" | ")
    };
    let separator = widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join("-+-");

    let header: Vec<String> = header.iter().map(|h| h.to_string()).collect();
    println!("{}", pad(&header).bold());
    println!("{}", separator);
    for row in rows {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| cell.render(*width, hyperlinks))
            .collect::<Vec<_>>()
            .join(" | ");
        println!("{}", line);
    }
    println!("{}", separator);
    println!("{}", pad(footer).bold());
}

/// Writes the outcome of a deletion run to `out`; failures go to stderr
pub fn write_deletion_report(report: &DeletionReport, out: &mut impl Write) -> io::Result<()> {
    if report.cancelled {
        writeln!(out, "{}", "Deletion cancelled.".yellow())?;
        return Ok(());
    }

    for failure in &report.failures {
        eprintln!("{} {}", "Error:".red().bold(), failure);
    }
    writeln!(
        out,
        "{}",
        format!(
            "Deleted {} files and {} directories.",
            report.deleted_files, report.deleted_dirs
        )
        .green()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hyperlink_escape_sequence() {
        let link = hyperlink(Path::new("/no/such/dir"), "dir");
        assert_eq!(link, "\x1b]8;;file:///no/such/dir\x1b\\dir\x1b]8;;\x1b\\");
    }

    #[test]
    fn test_linked_cell_padding_outside_link() {
        let cell = Cell::linked("ab", "/no/such/ab");
        let rendered = cell.render(5, true);
        assert!(rendered.ends_with("\x1b]8;;\x1b\\   "));
        assert!(rendered.contains("ab"));

        let plain = Cell::plain("ab").render(5, true);
        assert_eq!(plain, "ab   ");
    }

    #[test]
    fn test_cell_without_hyperlinks_has_no_osc8() {
        let rendered = Cell::linked("ab", "/no/such/ab").render(2, false);
        assert!(!rendered.contains("\x1b]8;;"));
    }

    #[test]
    fn test_deletion_report_text() {
        let report = DeletionReport {
            deleted_files: 3,
            deleted_dirs: 1,
            ..DeletionReport::default()
        };
        let mut out = Vec::new();
        write_deletion_report(&report, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Deleted 3 files and 1 directories."));

        let cancelled = DeletionReport {
            cancelled: true,
            ..DeletionReport::default()
        };
        let mut out = Vec::new();
        write_deletion_report(&cancelled, &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("Deletion cancelled."));
    }
}

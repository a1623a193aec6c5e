//! Output module for crawl results
//!
//! This module handles:
//! - Writing rows as a spreadsheet-friendly CSV file
//! - Summarizing a run for the log

mod csv_file;
pub mod stats;

pub use csv_file::{format_record, write_csv, write_rows, HEADER};
pub use stats::RunStatistics;

use std::path::{Path, PathBuf};

/// File name used when no output path is given
pub const DEFAULT_FILE_NAME: &str = "blog_posts.csv";

/// Resolves the output path: explicit value, else a file beside the executable
///
/// Falls back to the current directory when the executable location is
/// unknown.
pub fn resolve_output_path(explicit: Option<&str>) -> PathBuf {
    if let Some(path) = explicit.filter(|p| !p.trim().is_empty()) {
        return PathBuf::from(path);
    }

    std::env::current_exe()
        .ok()
        .as_deref()
        .and_then(Path::parent)
        .map(|dir| dir.join(DEFAULT_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_FILE_NAME))
}

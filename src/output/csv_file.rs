//! CSV serialization of output rows

use crate::article::OutputRow;
use crate::Result;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Column names, in output order
pub const HEADER: [&str; 7] = [
    "Title",
    "Author",
    "Comment Count",
    "Time",
    "Article Content",
    "Images In Article",
    "Image Count",
];

/// UTF-8 byte order mark, so spreadsheet tools pick the right encoding
const BOM: &[u8] = b"\xEF\xBB\xBF";

static LINE_BREAK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r?\n").unwrap());

/// Single-line cell: line breaks become spaces
fn flat(value: &str) -> String {
    LINE_BREAK_RE.replace_all(value, " ").trim().to_string()
}

/// Multi-line cell: line breaks are kept
fn multiline(value: &str) -> String {
    value.trim().to_string()
}

/// Formats one row as its seven cells
pub fn format_record(row: &OutputRow) -> [String; 7] {
    [
        flat(&row.title),
        flat(&row.author),
        flat(&row.comment_count.to_string()),
        flat(&row.time),
        multiline(&row.article_content),
        multiline(&row.media_urls.join("\n")),
        flat(&row.media_count().to_string()),
    ]
}

/// Writes the BOM, the header and every row to `writer`
pub fn write_rows<W: Write>(mut writer: W, rows: &[OutputRow]) -> Result<()> {
    writer.write_all(BOM)?;

    let mut csv = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    csv.write_record(HEADER)?;
    for row in rows {
        csv.write_record(format_record(row))?;
    }
    csv.flush()?;

    Ok(())
}

/// Creates (or truncates) `path` and writes the rows to it
pub fn write_csv(path: &Path, rows: &[OutputRow]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    write_rows(file, rows)?;
    tracing::debug!("Wrote {} rows to {}", rows.len(), path.display());

    Ok(())
}

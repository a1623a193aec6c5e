//! Run statistics
//!
//! A small summary of the rows a crawl produced, logged at the end of a run.

use crate::article::OutputRow;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStatistics {
    /// Total number of rows produced
    pub rows: usize,

    /// Rows with no extracted content (failed visits look like this)
    pub degraded: usize,

    /// Rows with a positive comment count
    pub with_comments: usize,

    /// Media items across all rows
    pub media_total: usize,
}

impl RunStatistics {
    /// Summarizes a set of rows
    pub fn from_rows(rows: &[OutputRow]) -> Self {
        rows.iter().fold(Self::default(), |mut stats, row| {
            stats.rows += 1;
            if row.is_content_empty() {
                stats.degraded += 1;
            }
            if row.comment_count > 0 {
                stats.with_comments += 1;
            }
            stats.media_total += row.media_count();
            stats
        })
    }

    /// Logs the summary at info level
    pub fn log(&self) {
        tracing::info!(
            "Run finished: {} rows, {} without content, {} with comments, {} media items",
            self.rows,
            self.degraded,
            self.with_comments,
            self.media_total
        );
        if self.degraded > 0 {
            tracing::warn!(
                "{} of {} rows carry no extracted content",
                self.degraded,
                self.rows
            );
        }
    }
}

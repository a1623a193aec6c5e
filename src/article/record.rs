use super::reference::ArticleReference;

/// Fields resolved from a single visited article page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedRecord {
    pub title: String,
    pub author: String,
    pub published_at: String,
    pub body_text: String,

    /// Absolute media URLs, unique by media key, in first-seen order
    pub media_urls: Vec<String>,

    /// Largest matched "<n> Comments" label, 0 when none matched
    pub comment_count: u64,
}

/// One output record per input reference
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputRow {
    pub title: String,
    pub author: String,
    pub comment_count: u64,
    pub time: String,
    pub article_content: String,
    pub media_urls: Vec<String>,
}

impl OutputRow {
    /// Merges a resolved record over the reference's seed data
    ///
    /// Each text field takes the resolver value when non-empty, then the seed
    /// value, then the empty string. Content fields come only from the record.
    pub fn merge(record: ExtractedRecord, reference: &ArticleReference) -> Self {
        let seed = &reference.seed;
        Self {
            title: prefer(record.title, seed.title.as_deref()),
            author: prefer(record.author, seed.author.as_deref()),
            comment_count: record.comment_count,
            time: prefer(record.published_at, seed.time.as_deref()),
            article_content: record.body_text,
            media_urls: record.media_urls,
        }
    }

    /// Builds the row emitted when visiting the reference failed
    pub fn degraded(reference: &ArticleReference) -> Self {
        let seed = &reference.seed;
        Self {
            title: seed.title.clone().unwrap_or_default(),
            author: seed.author.clone().unwrap_or_default(),
            comment_count: 0,
            time: seed.time.clone().unwrap_or_default(),
            article_content: String::new(),
            media_urls: Vec::new(),
        }
    }

    /// Number of media items in the row
    pub fn media_count(&self) -> usize {
        self.media_urls.len()
    }

    /// Returns true if the row carries no extracted content
    ///
    /// Degraded rows always look like this, so consumers should read it as
    /// "extraction failed" rather than "empty article".
    pub fn is_content_empty(&self) -> bool {
        self.article_content.is_empty() && self.media_urls.is_empty() && self.comment_count == 0
    }
}

fn prefer(resolved: String, seed: Option<&str>) -> String {
    if !resolved.is_empty() {
        resolved
    } else {
        seed.unwrap_or_default().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::Seed;

    fn seeded_reference() -> ArticleReference {
        ArticleReference::with_seed(
            "https://example.com/blogs/entry/post/",
            Seed {
                title: Some("Seed title".to_string()),
                author: Some("Seed author".to_string()),
                time: Some("2024-03-01".to_string()),
            },
        )
    }

    #[test]
    fn test_merge_prefers_resolved_values() {
        let record = ExtractedRecord {
            title: "Resolved".to_string(),
            author: "Someone".to_string(),
            published_at: "2024-03-02T10:00:00Z".to_string(),
            body_text: "Body".to_string(),
            media_urls: vec!["https://example.com/a.png".to_string()],
            comment_count: 4,
        };

        let row = OutputRow::merge(record, &seeded_reference());
        assert_eq!(row.title, "Resolved");
        assert_eq!(row.author, "Someone");
        assert_eq!(row.time, "2024-03-02T10:00:00Z");
        assert_eq!(row.comment_count, 4);
        assert_eq!(row.media_count(), 1);
    }

    #[test]
    fn test_merge_falls_back_to_seed_for_empty_fields() {
        let record = ExtractedRecord {
            body_text: "Body".to_string(),
            ..ExtractedRecord::default()
        };

        let row = OutputRow::merge(record, &seeded_reference());
        assert_eq!(row.title, "Seed title");
        assert_eq!(row.author, "Seed author");
        assert_eq!(row.time, "2024-03-01");
        assert_eq!(row.article_content, "Body");
    }

    #[test]
    fn test_merge_without_seed_leaves_empty_strings() {
        let row = OutputRow::merge(
            ExtractedRecord::default(),
            &ArticleReference::new("https://example.com/x"),
        );
        assert_eq!(row.title, "");
        assert_eq!(row.author, "");
        assert_eq!(row.time, "");
    }

    #[test]
    fn test_degraded_row_uses_seed_only() {
        let row = OutputRow::degraded(&seeded_reference());
        assert_eq!(row.title, "Seed title");
        assert_eq!(row.comment_count, 0);
        assert!(row.is_content_empty());
    }
}

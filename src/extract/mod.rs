//! Field resolution for article pages
//!
//! This module turns a loaded article document into an `ExtractedRecord`:
//! - Title, author and publish time via ordered candidate chains
//! - Cleaned body text
//! - In-body media references
//! - Comment count (host document first, discussion widget last)
//!
//! Resolution never fails: anything missing degrades to an empty value.

pub mod body;
pub mod comments;
pub mod fields;
pub mod media;
pub mod selectors;
pub mod text;

pub use body::ArticleBody;
pub use media::{best_srcset_candidate, MediaRules};

use crate::article::ExtractedRecord;
use crate::config::Config;
use crate::crawler::{Page, PageSnapshot};
use scraper::Html;
use url::Url;

/// Resolves every field that can be read from the document alone
pub fn resolve(html: &str, page_url: &Url, config: &Config) -> ExtractedRecord {
    let document = Html::parse_document(html);
    resolve_document(&document, page_url, config)
}

/// Same as [`resolve`] for an already parsed document
pub fn resolve_document(document: &Html, page_url: &Url, config: &Config) -> ExtractedRecord {
    let attribution = fields::resolve_attribution(document);
    let published_at = fields::resolve_published_at(document);

    let body = ArticleBody::locate(document);
    if body.is_none() {
        tracing::debug!("No article body found on {}", page_url);
    }

    let body_text = body.as_ref().map(ArticleBody::text).unwrap_or_default();
    let media_urls = body
        .as_ref()
        .map(|b| media::collect(b, page_url, &MediaRules::from_config(config)))
        .unwrap_or_default();
    let comment_count = comments::count_on_page(document, body.as_ref());

    ExtractedRecord {
        title: attribution.title,
        author: attribution.author,
        published_at,
        body_text,
        media_urls,
        comment_count,
    }
}

/// Resolves a loaded page, checking the discussion widget if no count was found
pub async fn resolve_page(
    page: &mut dyn Page,
    snapshot: &PageSnapshot,
    config: &Config,
) -> ExtractedRecord {
    let record = resolve(&snapshot.html, &snapshot.url, config);
    if record.comment_count > 0 {
        return record;
    }

    let widget_count = comments::count_widget_comments(page, &config.comments).await;
    if widget_count == 0 {
        return record;
    }

    tracing::trace!(
        "Comment count {} read from discussion widget on {}",
        widget_count,
        snapshot.url
    );
    ExtractedRecord {
        comment_count: widget_count,
        ..record
    }
}

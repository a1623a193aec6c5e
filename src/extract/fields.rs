//! Title, author and publish-time candidate chains
//!
//! Each field is resolved by an ordered list of strategies
//! (`fn(&Html) -> Option<String>`); the first non-empty value wins.

use crate::extract::selectors::compile;
use crate::extract::text::{element_text, norm, strip_by_prefix};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

/// One candidate source for a field
pub type Strategy = fn(&Html) -> Option<String>;

static TITLE_SELECTORS: Lazy<Vec<Selector>> =
    Lazy::new(|| compile(&["article h1", "h1.entry-title", "h1.post-title", "h1"]));

static OG_TITLE: Lazy<Vec<Selector>> =
    Lazy::new(|| compile(&[r#"meta[property="og:title"][content]"#]));

static DOCUMENT_TITLE: Lazy<Vec<Selector>> = Lazy::new(|| compile(&["title"]));

static AUTHOR_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    compile(&[
        r#"[rel="author"]"#,
        ".author a",
        ".byline a",
        ".byline",
        ".post-author",
        ".entry-author",
        ".entry-meta .byline .author a",
        ".entry-meta .author a",
        ".entry-header .byline .author a",
        ".post-meta .author a",
    ])
});

static META_AUTHOR: Lazy<Vec<Selector>> =
    Lazy::new(|| compile(&[r#"meta[name="author"][content]"#]));

static TIME_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    compile(&[
        "time[datetime]",
        ".posted-on time",
        "time",
        ".date",
        ".entry-date",
    ])
});

static META_PUBLISHED: Lazy<Vec<Selector>> =
    Lazy::new(|| compile(&[r#"meta[property="article:published_time"][content]"#]));

/// Title candidates in priority order
pub const TITLE_CHAIN: &[Strategy] = &[title_from_heading, title_from_og, title_from_document];

/// Author candidates in priority order
pub const AUTHOR_CHAIN: &[Strategy] = &[author_from_byline, author_from_meta];

/// Publish-time candidates in priority order
pub const TIME_CHAIN: &[Strategy] = &[time_from_markup, time_from_meta];

/// Runs a chain and returns the first non-empty value
pub fn first_match(document: &Html, chain: &[Strategy]) -> Option<String> {
    chain
        .iter()
        .filter_map(|strategy| strategy(document))
        .find(|value| !value.is_empty())
}

/// Resolved title and author after the "by" override
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attribution {
    pub title: String,
    pub author: String,
}

/// Resolves the title and author of a document
///
/// A title of the form "<title> by <author>" is authoritative: the text after
/// the last " by " replaces any author found in markup, and the title is cut
/// before it. Each half only replaces its field when non-empty.
pub fn resolve_attribution(document: &Html) -> Attribution {
    let title = first_match(document, TITLE_CHAIN).unwrap_or_default();
    let author = first_match(document, AUTHOR_CHAIN).unwrap_or_default();
    apply_by_override(title, author)
}

/// Applies the trailing " by <author>" rule to a resolved title
pub fn apply_by_override(title: String, author: String) -> Attribution {
    // ASCII lowercasing keeps byte offsets valid for the original string
    let Some(idx) = title.to_ascii_lowercase().rfind(" by ") else {
        return Attribution { title, author };
    };

    let head = norm(&title[..idx]);
    let tail = norm(&title[idx + " by ".len()..]);

    tracing::trace!("Title carries author {:?}", tail);

    Attribution {
        title: if head.is_empty() { title } else { head },
        author: if tail.is_empty() { author } else { tail },
    }
}

/// Resolves the publish time of a document
pub fn resolve_published_at(document: &Html) -> String {
    first_match(document, TIME_CHAIN).unwrap_or_default()
}

fn first_text(document: &Html, selectors: &[Selector]) -> Option<String> {
    selectors
        .iter()
        .filter_map(|selector| document.select(selector).next())
        .map(|element| element_text(&element))
        .find(|text| !text.is_empty())
}

fn meta_content(document: &Html, selectors: &[Selector]) -> Option<String> {
    selectors
        .iter()
        .filter_map(|selector| document.select(selector).next())
        .filter_map(|element| element.value().attr("content").map(norm))
        .find(|content| !content.is_empty())
}

fn title_from_heading(document: &Html) -> Option<String> {
    first_text(document, &TITLE_SELECTORS)
}

fn title_from_og(document: &Html) -> Option<String> {
    meta_content(document, &OG_TITLE)
}

fn title_from_document(document: &Html) -> Option<String> {
    first_text(document, &DOCUMENT_TITLE)
}

fn author_from_byline(document: &Html) -> Option<String> {
    AUTHOR_SELECTORS
        .iter()
        .filter_map(|selector| document.select(selector).next())
        .map(|element| norm(&strip_by_prefix(&element_text(&element))))
        .find(|author| !author.is_empty())
}

fn author_from_meta(document: &Html) -> Option<String> {
    meta_content(document, &META_AUTHOR)
}

fn time_from_markup(document: &Html) -> Option<String> {
    TIME_SELECTORS
        .iter()
        .filter_map(|selector| document.select(selector).next())
        .map(|element| {
            element
                .value()
                .attr("datetime")
                .map(|dt| dt.trim().to_string())
                .filter(|dt| !dt.is_empty())
                .unwrap_or_else(|| element_text(&element))
        })
        .find(|time| !time.is_empty())
}

fn time_from_meta(document: &Html) -> Option<String> {
    meta_content(document, &META_PUBLISHED)
}

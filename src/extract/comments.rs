//! Comment count resolution
//!
//! The host document is scanned for an exact "N Comments" label, first among
//! elements following the article body, then anywhere, then inside legacy
//! comment-section headers. Only when all of that yields zero is the embedded
//! discussion widget checked.

use crate::config::CommentsConfig;
use crate::crawler::Page;
use crate::extract::body::ArticleBody;
use crate::extract::selectors::compile_one;
use crate::extract::text::element_text;
use crate::url::matches_any_host_suffix;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

static LABEL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(\d+)\s+Comments?$").unwrap());

static WIDGET_LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(\d+)\s+Comment(?:s|\(s\))?$").unwrap());

static LABEL_CANDIDATES: Lazy<Option<Selector>> =
    Lazy::new(|| compile_one("h1, h2, h3, h4, h5, h6, span, div, p, a, button, strong, em"));

static LEGACY_HEADERS: Lazy<Option<Selector>> =
    Lazy::new(|| compile_one("#comments h2, #comments h3, .comments h2, .comments h3"));

static WIDGET_CANDIDATES: Lazy<Option<Selector>> =
    Lazy::new(|| compile_one("h1, h2, h3, span, div, p, a, button, strong, em"));

/// Largest count among elements whose whole text is a comment label
fn max_label<'a, I>(elements: I, pattern: &Regex) -> u64
where
    I: IntoIterator<Item = ElementRef<'a>>,
{
    elements
        .into_iter()
        .filter_map(|el| {
            let text = element_text(&el);
            pattern
                .captures(&text)
                .and_then(|c| c.get(1))
                .and_then(|m| m.as_str().parse::<u64>().ok())
        })
        .max()
        .unwrap_or(0)
}

fn select_all<'a>(document: &'a Html, selector: &Option<Selector>) -> Vec<ElementRef<'a>> {
    match selector {
        Some(selector) => document.select(selector).collect(),
        None => Vec::new(),
    }
}

/// Counts comments from the host document (no widget probing)
pub fn count_on_page(document: &Html, body: Option<&ArticleBody>) -> u64 {
    let candidates = select_all(document, &LABEL_CANDIDATES);

    if let Some(body) = body {
        let container = body.container();
        // Skip the container's own subtree, then everything left is "after" it
        let subtree = container.descendants().count();
        let following: HashSet<_> = document
            .tree
            .root()
            .descendants()
            .skip_while(|node| node.id() != container.id())
            .skip(subtree)
            .map(|node| node.id())
            .collect();

        let count = max_label(
            candidates.iter().copied().filter(|el| following.contains(&el.id())),
            &LABEL_RE,
        );
        if count > 0 {
            return count;
        }
    }

    let count = max_label(candidates, &LABEL_RE);
    if count > 0 {
        return count;
    }

    max_label(select_all(document, &LEGACY_HEADERS), &LABEL_RE)
}

/// Counts comments from the widget's own document
pub fn count_in_widget(html: &str) -> u64 {
    let document = Html::parse_document(html);
    max_label(select_all(&document, &WIDGET_CANDIDATES), &WIDGET_LABEL_RE)
}

/// Waits for the discussion widget frame and reads its label
///
/// Any failure (no frame in time, frame not loadable, no label) yields 0.
pub async fn count_widget_comments(page: &mut dyn Page, config: &CommentsConfig) -> u64 {
    let domains = &config.widget_domains;
    let is_widget = |frame: &Url| {
        frame
            .host_str()
            .map_or(false, |host| matches_any_host_suffix(domains, host))
    };

    let Some(frame) = page
        .wait_for_frame(
            &is_widget,
            config.widget_timeout(),
            config.widget_poll_interval(),
        )
        .await
    else {
        return 0;
    };

    match tokio::time::timeout(config.widget_timeout(), page.frame_document(&frame)).await {
        Ok(Ok(html)) => count_in_widget(&html),
        Ok(Err(e)) => {
            tracing::debug!("Discussion widget {} failed to load: {}", frame, e);
            0
        }
        Err(_) => {
            tracing::debug!("Discussion widget {} timed out", frame);
            0
        }
    }
}

//! Article links from a blog listing page

use crate::article::{ArticleReference, Seed};
use crate::config::Config;
use crate::extract::selectors::compile_one;
use crate::extract::text::{element_text, norm, strip_by_prefix};
use crate::url::resolve_http_url;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

static LINK: Lazy<Option<Selector>> = Lazy::new(|| compile_one("a"));

static SEED_AUTHOR: Lazy<Option<Selector>> = Lazy::new(|| {
    compile_one(r#"[rel="author"], .author a, .byline a, .byline, .post-author, .entry-author"#)
});

static SEED_TIME: Lazy<Option<Selector>> =
    Lazy::new(|| compile_one("time[datetime], time, .date, .entry-date, .posted-on time"));

static INDEX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"/blogs/?$").unwrap());

static TAXONOMY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"/(category|tag|author)/").unwrap());

static PAGINATION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)[?&](paged|page)=").unwrap());

/// Listing rules taken from the configuration
pub struct ListingRules<'c> {
    article_path: &'c str,
    max_links: usize,
    ancestor_depth: usize,
    min_text_len: usize,
}

impl<'c> ListingRules<'c> {
    pub fn from_config(config: &'c Config) -> Self {
        Self {
            article_path: &config.site.article_path,
            max_links: config.crawler.max_listing_links,
            ancestor_depth: config.crawler.ancestor_depth,
            min_text_len: config.crawler.min_link_text_len,
        }
    }

    /// Returns true if the absolute href looks like a single article page
    pub fn is_article_href(&self, href: &str) -> bool {
        href.contains(self.article_path)
            && !INDEX_RE.is_match(href)
            && !TAXONOMY_RE.is_match(href)
            && !PAGINATION_RE.is_match(href)
            && !href.contains('#')
    }
}

/// Extracts article references from a listing document
///
/// Links are deduplicated by absolute href (first occurrence wins) and the
/// result is capped at the configured maximum.
pub fn discover(html: &str, listing_url: &Url, config: &Config) -> Vec<ArticleReference> {
    let rules = ListingRules::from_config(config);
    let document = Html::parse_document(html);
    let Some(link_selector) = LINK.as_ref() else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut references = Vec::new();

    for link in document.select(link_selector) {
        if references.len() >= rules.max_links {
            break;
        }

        let Some(href) = link
            .value()
            .attr("href")
            .and_then(|href| resolve_http_url(href, listing_url))
            .map(String::from)
        else {
            continue;
        };

        if !rules.is_article_href(&href) || seen.contains(&href) {
            continue;
        }

        let title = element_text(&link);
        if title.chars().count() < rules.min_text_len {
            tracing::trace!("Skipping listing link {} with short text {:?}", href, title);
            continue;
        }

        let mut seed = nearby_seed(link, rules.ancestor_depth);
        seed.title = Some(title);

        seen.insert(href.clone());
        references.push(ArticleReference::with_seed(href, seed));
    }

    tracing::debug!("Discovered {} article links on {}", references.len(), listing_url);
    references
}

/// Looks for author and time markup around a listing link
///
/// The link itself and up to `depth - 1` of its ancestors are searched; the
/// first non-empty value found for each field wins.
fn nearby_seed(link: ElementRef, depth: usize) -> Seed {
    let mut author = String::new();
    let mut time = String::new();
    let mut current = Some(link);

    for _ in 0..depth {
        let Some(el) = current else {
            break;
        };

        if author.is_empty() {
            if let Some(found) = first_within(el, &SEED_AUTHOR) {
                author = strip_by_prefix(&element_text(&found));
            }
        }

        if time.is_empty() {
            if let Some(found) = first_within(el, &SEED_TIME) {
                time = found
                    .value()
                    .attr("datetime")
                    .filter(|v| !v.is_empty())
                    .map(String::from)
                    .unwrap_or_else(|| element_text(&found));
            }
        }

        current = el.parent().and_then(ElementRef::wrap);
    }

    Seed {
        title: None,
        author: non_empty(author),
        time: non_empty(norm(&time)),
    }
}

fn first_within<'a>(element: ElementRef<'a>, selector: &Option<Selector>) -> Option<ElementRef<'a>> {
    selector.as_ref().and_then(|s| element.select(s).next())
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

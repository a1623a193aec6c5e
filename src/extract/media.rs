//! In-body media discovery
//!
//! Media references are gathered from the cleaned article body in a fixed
//! source order, all feeding one `MediaSet`:
//!
//! 1. `<img>` (lazy-load attributes first, then `src`, then srcsets)
//! 2. `<picture><source srcset>`
//! 3. links to image files
//! 4. `<video>` sources
//! 5. embed frames from known video hosts
//! 6. links to video files
//!
//! Sources 1-3 must be site uploads; video sources are kept from any host.

use crate::config::Config;
use crate::extract::body::ArticleBody;
use crate::extract::selectors::compile_one;
use crate::url::{matches_any_host_suffix, matches_host_suffix, resolve_http_url, MediaSet};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};
use url::Url;

static IMG: Lazy<Option<Selector>> = Lazy::new(|| compile_one("img"));
static PICTURE_SOURCE: Lazy<Option<Selector>> = Lazy::new(|| compile_one("picture source[srcset]"));
static LINK: Lazy<Option<Selector>> = Lazy::new(|| compile_one("a[href]"));
static VIDEO_SOURCE: Lazy<Option<Selector>> =
    Lazy::new(|| compile_one("video[src], video source[src]"));
static IFRAME: Lazy<Option<Selector>> = Lazy::new(|| compile_one("iframe[src]"));

static IMAGE_FILE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(jpg|jpeg|png|gif|webp)(\?.*)?$").unwrap());

static VIDEO_FILE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(mp4|webm|ogg)(\?.*)?$").unwrap());

/// Where an image URL may come from on an `<img>`, in priority order
enum ImageSource {
    Attr(&'static str),
    Srcset(&'static str),
}

const IMAGE_SOURCES: &[ImageSource] = &[
    ImageSource::Attr("data-flickity-lazyload-src"),
    ImageSource::Srcset("data-flickity-lazyload-srcset"),
    ImageSource::Attr("data-lazy-src"),
    ImageSource::Attr("data-src"),
    ImageSource::Attr("data-original"),
    ImageSource::Attr("src"),
    ImageSource::Srcset("data-lazy-srcset"),
    ImageSource::Srcset("srcset"),
];

/// Site rules for in-body media
pub struct MediaRules<'c> {
    content_host: &'c str,
    upload_path: &'c str,
    video_hosts: &'c [String],
}

impl<'c> MediaRules<'c> {
    pub fn from_config(config: &'c Config) -> Self {
        Self {
            content_host: &config.site.content_host,
            upload_path: &config.site.upload_path,
            video_hosts: &config.media.video_hosts,
        }
    }

    /// Returns true if the URL is an upload served by the content site
    fn is_site_upload(&self, url: &Url) -> bool {
        url.host_str()
            .map_or(false, |host| matches_host_suffix(self.content_host, host))
            && url.path().contains(self.upload_path)
    }

    fn is_video_host(&self, url: &Url) -> bool {
        url.host_str()
            .map_or(false, |host| matches_any_host_suffix(self.video_hosts, host))
    }
}

/// Collects media URLs from the cleaned body, keyed and ordered by first sighting
pub fn collect(body: &ArticleBody, page_url: &Url, rules: &MediaRules) -> Vec<String> {
    let mut media = MediaSet::new();

    let add_upload = |raw: &str, media: &mut MediaSet| {
        if let Some(url) = resolve_http_url(raw, page_url) {
            if rules.is_site_upload(&url) {
                media.insert(url.as_str(), page_url);
            }
        }
    };

    // 1) images
    for img in select(body, &IMG) {
        if let Some(raw) = image_url(&img) {
            add_upload(raw.as_str(), &mut media);
        }
    }

    // 2) responsive picture sources
    for source in select(body, &PICTURE_SOURCE) {
        if let Some(raw) = source.value().attr("srcset").and_then(best_srcset_candidate) {
            add_upload(raw.as_str(), &mut media);
        }
    }

    // 3) links to image files
    for link in select(body, &LINK) {
        let href = link.value().attr("href").unwrap_or_default();
        if IMAGE_FILE_RE.is_match(href) {
            add_upload(href, &mut media);
        }
    }

    // 4) video elements
    for video in select(body, &VIDEO_SOURCE) {
        if let Some(src) = video.value().attr("src") {
            media.insert(src, page_url);
        }
    }

    // 5) embedded players
    for frame in select(body, &IFRAME) {
        let src = frame.value().attr("src").unwrap_or_default();
        if let Some(url) = resolve_http_url(src, page_url) {
            if rules.is_video_host(&url) {
                media.insert(url.as_str(), page_url);
            }
        }
    }

    // 6) links to video files
    for link in select(body, &LINK) {
        let href = link.value().attr("href").unwrap_or_default();
        if VIDEO_FILE_RE.is_match(href) {
            media.insert(href, page_url);
        }
    }

    tracing::trace!("Collected {} media items from {}", media.len(), page_url);
    media.into_vec()
}

fn select<'a>(body: &ArticleBody<'a>, selector: &Option<Selector>) -> Vec<ElementRef<'a>> {
    match selector {
        Some(selector) => body.select(selector).collect(),
        None => Vec::new(),
    }
}

/// Resolves the best URL for an `<img>`
fn image_url(img: &ElementRef) -> Option<String> {
    IMAGE_SOURCES.iter().find_map(|source| {
        let value = match source {
            ImageSource::Attr(name) => img.value().attr(name).map(str::to_string),
            ImageSource::Srcset(name) => img.value().attr(name).and_then(best_srcset_candidate),
        };
        value.filter(|v| !v.trim().is_empty())
    })
}

/// Picks the candidate with the largest declared width from a srcset
///
/// Candidates without a width descriptor count as width 0, and on equal
/// widths the first listed candidate wins.
pub fn best_srcset_candidate(srcset: &str) -> Option<String> {
    let mut best: Option<(&str, u64)> = None;

    for candidate in srcset.split(',') {
        let mut tokens = candidate.split_whitespace();
        let Some(url) = tokens.next() else {
            continue;
        };
        let width = tokens
            .next()
            .and_then(|descriptor| descriptor.strip_suffix('w'))
            .and_then(|w| w.parse::<u64>().ok())
            .unwrap_or(0);

        if best.map_or(true, |(_, best_width)| width > best_width) {
            best = Some((url, width));
        }
    }

    best.map(|(url, _)| url.to_string())
}

//! Full-corpus enumeration through the blog's JSON post collection

use crate::article::{ArticleReference, Seed};
use crate::config::SiteConfig;
use crate::crawler::fetcher;
use crate::{HarvestError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashSet;
use url::Url;

/// One entry of a collection page; only the fields requested are present
#[derive(Debug, Deserialize)]
struct CollectionItem {
    link: Option<String>,
    date: Option<String>,
}

/// Page-by-page reader of the post collection endpoint
pub struct PaginatedSource {
    client: Client,
    endpoint: Url,
    page_size: u32,
    total_pages_header: String,
}

impl PaginatedSource {
    pub fn new(client: Client, endpoint: Url, page_size: u32, total_pages_header: &str) -> Self {
        Self {
            client,
            endpoint,
            page_size,
            total_pages_header: total_pages_header.to_string(),
        }
    }

    /// Builds a source for the configured site
    pub fn from_config(client: Client, site: &SiteConfig) -> Result<Self> {
        let endpoint = Url::parse(&site.collection_endpoint)?;
        Ok(Self::new(
            client,
            endpoint,
            site.page_size,
            &site.total_pages_header,
        ))
    }

    /// Lists every article in the collection, newest first
    ///
    /// All pages up to the advertised total are fetched even when `since`
    /// excludes everything on the later ones. A failed page ends the traversal
    /// and whatever was gathered so far is returned.
    pub async fn enumerate_all(&self, since: Option<DateTime<Utc>>) -> Vec<ArticleReference> {
        let mut seen = HashSet::new();
        let mut references = Vec::new();
        let mut page = 1u32;
        let mut total_pages = 1u32;

        loop {
            let (items, advertised) = match self.fetch_page(page).await {
                Ok(result) => result,
                Err(e) => {
                    tracing::warn!("Stopping collection traversal at page {}: {}", page, e);
                    break;
                }
            };
            if let Some(advertised) = advertised {
                total_pages = advertised;
            }
            tracing::debug!(
                "Collection page {}/{} returned {} items",
                page,
                total_pages,
                items.len()
            );

            for item in items {
                let Some(link) = item.link.filter(|l| !l.is_empty()) else {
                    continue;
                };
                if is_before(item.date.as_deref(), since) {
                    continue;
                }
                if seen.insert(link.clone()) {
                    let seed = Seed {
                        time: item.date.filter(|d| !d.is_empty()),
                        ..Seed::default()
                    };
                    references.push(ArticleReference::with_seed(link, seed));
                }
            }

            page += 1;
            if page > total_pages {
                break;
            }
        }

        tracing::info!("Collection lists {} articles", references.len());
        references
    }

    /// Fetches one page, returning its items and the advertised page total
    async fn fetch_page(&self, page: u32) -> Result<(Vec<CollectionItem>, Option<u32>)> {
        let url = self.page_url(page);
        let response = fetcher::get(&self.client, &url).await?;

        let advertised = response
            .headers()
            .get(self.total_pages_header.as_str())
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u32>().ok());

        let items = response
            .json::<Vec<CollectionItem>>()
            .await
            .map_err(|e| HarvestError::Http {
                url: url.to_string(),
                source: e,
            })?;

        Ok((items, advertised))
    }

    fn page_url(&self, page: u32) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("per_page", &self.page_size.to_string())
            .append_pair("page", &page.to_string())
            .append_pair("_fields", "link,date")
            .append_pair("orderby", "date")
            .append_pair("order", "desc");
        url
    }
}

/// Returns true if the item date parses and is strictly earlier than `since`
fn is_before(date: Option<&str>, since: Option<DateTime<Utc>>) -> bool {
    match (date, since) {
        (Some(date), Some(since)) => match parse_timestamp(date) {
            Ok(published) => published < since,
            Err(_) => false,
        },
        _ => false,
    }
}

/// Parses a cutoff or publish timestamp
///
/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM:SS` (optionally with fractional
/// seconds) and `YYYY-MM-DD`. Values without an offset are taken as UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(Utc.from_utc_datetime(&naive));
    }
    if let Some(naive) = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(Utc.from_utc_datetime(&naive));
    }

    Err(HarvestError::InvalidTimestamp(value.to_string()))
}

//! Crawler coordinator - main crawl orchestration logic
//!
//! This module ties the pieces of a run together:
//! - Resolving the crawl mode into article references
//! - Running the worker pool over them
//! - Returning one output row per reference

use crate::article::{ArticleReference, OutputRow};
use crate::config::Config;
use crate::crawler::browser::{Browser, HttpBrowser, Page, PageSnapshot};
use crate::crawler::build_http_client;
use crate::crawler::scheduler::Scheduler;
use crate::discovery::{discover, PaginatedSource};
use crate::{HarvestError, Result};
use chrono::{DateTime, Utc};
use reqwest::Client;
use url::Url;

/// Where the articles of a run come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlMode {
    /// Visit exactly these URLs
    Explicit(Vec<String>),

    /// Enumerate the whole collection, optionally only posts since a cutoff
    FullCorpus { since: Option<DateTime<Utc>> },

    /// Visit the articles linked from the first listing page
    Listing,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Config,
    client: Client,
    browser: Box<dyn Browser>,
}

impl Coordinator {
    /// Creates a coordinator that loads pages over HTTP
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(HarvestError)` - The HTTP client could not be built
    pub fn new(config: Config) -> Result<Self> {
        let client = build_http_client(&config.user_agent, config.crawler.navigation_timeout())?;
        let browser = Box::new(HttpBrowser::new(client.clone()));
        Ok(Self::with_browser(config, client, browser))
    }

    /// Creates a coordinator that visits articles through `browser`
    ///
    /// `client` is only used for the JSON collection endpoint.
    pub fn with_browser(config: Config, client: Client, browser: Box<dyn Browser>) -> Self {
        Self {
            config,
            client,
            browser,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs a complete crawl and returns the rows in visit order
    ///
    /// Only a failure to load the listing page (listing mode) is fatal; every
    /// per-article failure becomes a degraded row.
    pub async fn run(&self, mode: CrawlMode) -> Result<Vec<OutputRow>> {
        let references = self.references(mode).await?;
        tracing::info!(
            "Visiting {} articles with up to {} concurrent pages",
            references.len(),
            self.config.crawler.concurrency
        );

        let rows = Scheduler::new(self.browser.as_ref(), &self.config)
            .run_pool(&references)
            .await;

        Ok(rows)
    }

    /// Resolves the crawl mode into the list of articles to visit
    pub async fn references(&self, mode: CrawlMode) -> Result<Vec<ArticleReference>> {
        match mode {
            CrawlMode::Explicit(urls) => {
                tracing::info!("Crawling {} explicit URLs", urls.len());
                Ok(urls.into_iter().map(ArticleReference::new).collect())
            }
            CrawlMode::FullCorpus { since } => {
                match since {
                    Some(since) => tracing::info!("Enumerating all posts since {}", since),
                    None => tracing::info!("Enumerating all posts"),
                }
                let source = PaginatedSource::from_config(self.client.clone(), &self.config.site)?;
                Ok(source.enumerate_all(since).await)
            }
            CrawlMode::Listing => {
                let listing_url = Url::parse(&self.config.site.listing_url)?;
                tracing::info!("Reading listing page {}", listing_url);

                let snapshot = self.load_listing(&listing_url).await?;
                Ok(discover(&snapshot.html, &snapshot.url, &self.config))
            }
        }
    }

    async fn load_listing(&self, listing_url: &Url) -> Result<PageSnapshot> {
        let mut page = self.browser.new_page().await?;
        let outcome = self.goto(page.as_mut(), listing_url).await;
        page.close().await;
        outcome
    }

    async fn goto(&self, page: &mut dyn Page, url: &Url) -> Result<PageSnapshot> {
        tokio::time::timeout(self.config.crawler.navigation_timeout(), page.goto(url))
            .await
            .map_err(|_| HarvestError::Timeout {
                url: url.to_string(),
            })?
    }
}

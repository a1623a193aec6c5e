//! Browser boundary
//!
//! Article visits go through the `Browser`/`Page` traits so the crawl can be
//! driven by anything that can load a page and list its frames. The crate
//! ships `HttpBrowser`, which loads static HTML over HTTP and reports the
//! `<iframe>` elements present in the served markup as frames.

use crate::crawler::fetcher::{build_http_client, fetch_html};
use crate::config::UserAgentConfig;
use crate::url::resolve_http_url;
use crate::{HarvestError, Result};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use url::Url;

/// The document a page ended up on after navigation
#[derive(Debug, Clone)]
pub struct PageSnapshot {
    /// Final URL after redirects
    pub url: Url,
    pub html: String,
}

/// Predicate used to pick a frame by its URL
pub type FrameMatcher<'m> = &'m (dyn Fn(&Url) -> bool + Send + Sync);

/// A single browsing context
#[async_trait]
pub trait Page: Send {
    /// Navigates to `url` and returns the loaded document
    async fn goto(&mut self, url: &Url) -> Result<PageSnapshot>;

    /// URLs of the frames currently attached to the page
    async fn frames(&mut self) -> Result<Vec<Url>>;

    /// Returns the document loaded in the given frame
    async fn frame_document(&mut self, frame: &Url) -> Result<String>;

    /// Polls the page's frames until one satisfies `matches`
    ///
    /// Returns `None` when nothing matches within `timeout`. A zero timeout
    /// never matches.
    async fn wait_for_frame(
        &mut self,
        matches: FrameMatcher<'_>,
        timeout: Duration,
        poll: Duration,
    ) -> Option<Url> {
        if timeout.is_zero() {
            return None;
        }

        let search = async {
            loop {
                match self.frames().await {
                    Ok(frames) => {
                        if let Some(frame) = frames.into_iter().find(|f| matches(f)) {
                            return Some(frame);
                        }
                    }
                    Err(e) => {
                        tracing::debug!("Listing frames failed: {}", e);
                        return None;
                    }
                }
                tokio::time::sleep(poll).await;
            }
        };

        tokio::time::timeout(timeout, search).await.ok().flatten()
    }

    /// Releases the page; called once per article whether or not it loaded
    async fn close(&mut self);
}

/// Source of fresh pages
#[async_trait]
pub trait Browser: Send + Sync {
    async fn new_page(&self) -> Result<Box<dyn Page>>;
}

/// Static-HTML browser backed by a shared HTTP client
///
/// Scripts never run, so only `<iframe>` elements already present in the
/// served HTML are reported as frames. Discussion widgets injected by script
/// are never found; counting those needs a rendering `Browser` implementation.
#[derive(Debug, Clone)]
pub struct HttpBrowser {
    client: Client,
}

impl HttpBrowser {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a browser whose requests identify as `user_agent`
    pub fn with_user_agent(user_agent: &UserAgentConfig, timeout: Duration) -> Result<Self> {
        let client = build_http_client(user_agent, timeout)?;
        Ok(Self::new(client))
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl Browser for HttpBrowser {
    async fn new_page(&self) -> Result<Box<dyn Page>> {
        Ok(Box::new(HttpPage {
            client: self.client.clone(),
            current: None,
        }))
    }
}

/// A page loaded over plain HTTP; scripts are never run
pub struct HttpPage {
    client: Client,
    current: Option<PageSnapshot>,
}

#[async_trait]
impl Page for HttpPage {
    async fn goto(&mut self, url: &Url) -> Result<PageSnapshot> {
        let (final_url, html) = fetch_html(&self.client, url).await?;
        let snapshot = PageSnapshot {
            url: final_url,
            html,
        };
        self.current = Some(snapshot.clone());
        Ok(snapshot)
    }

    async fn frames(&mut self) -> Result<Vec<Url>> {
        let current = self
            .current
            .as_ref()
            .ok_or_else(|| HarvestError::Browser("page has not been loaded".to_string()))?;
        Ok(frame_sources(&current.html, &current.url))
    }

    async fn frame_document(&mut self, frame: &Url) -> Result<String> {
        let (_, html) = fetch_html(&self.client, frame).await?;
        Ok(html)
    }

    // Static markup never changes, so a single look is enough
    async fn wait_for_frame(
        &mut self,
        matches: FrameMatcher<'_>,
        timeout: Duration,
        _poll: Duration,
    ) -> Option<Url> {
        if timeout.is_zero() {
            return None;
        }
        self.frames()
            .await
            .ok()?
            .into_iter()
            .find(|frame| matches(frame))
    }

    async fn close(&mut self) {
        self.current = None;
    }
}

/// Resolves the `src` of every `<iframe>` in the document
fn frame_sources(html: &str, base: &Url) -> Vec<Url> {
    let Ok(selector) = Selector::parse("iframe[src]") else {
        return Vec::new();
    };
    let document = Html::parse_document(html);

    document
        .select(&selector)
        .filter_map(|frame| frame.value().attr("src"))
        .filter_map(|src| resolve_http_url(src, base))
        .collect()
}

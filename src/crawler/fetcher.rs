//! HTTP fetcher implementation
//!
//! This module handles the plain HTTP requests of a crawl:
//! - Building HTTP clients with proper user agent strings
//! - GET requests for pages and frame documents
//! - Error classification into `HarvestError`

use crate::config::UserAgentConfig;
use crate::{HarvestError, Result};
use reqwest::{Client, Response};
use std::time::Duration;
use url::Url;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Total timeout applied to each request
///
/// # Example
///
/// ```no_run
/// use post_harvest::config::UserAgentConfig;
/// use post_harvest::crawler::build_http_client;
/// use std::time::Duration;
///
/// let config = UserAgentConfig::default();
/// let client = build_http_client(&config, Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> std::result::Result<Client, reqwest::Error> {
    // Format: CrawlerName/Version (+ContactURL)
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10).min(timeout))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Sends a GET request and rejects non-2xx responses
pub async fn get(client: &Client, url: &Url) -> Result<Response> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| classify(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(HarvestError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    Ok(response)
}

/// Fetches a page and returns its final URL (after redirects) and body
pub async fn fetch_html(client: &Client, url: &Url) -> Result<(Url, String)> {
    let response = get(client, url).await?;
    let final_url = response.url().clone();

    let body = response.text().await.map_err(|e| classify(url, e))?;
    tracing::trace!("Fetched {} ({} bytes)", final_url, body.len());

    Ok((final_url, body))
}

/// Maps a transport error onto the crate error type
fn classify(url: &Url, error: reqwest::Error) -> HarvestError {
    if error.is_timeout() {
        HarvestError::Timeout {
            url: url.to_string(),
        }
    } else {
        HarvestError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}

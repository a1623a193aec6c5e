use serde::Deserialize;
use std::time::Duration;

/// Upper bound for the worker pool size
pub const MAX_CONCURRENCY: usize = 10;

/// Main configuration structure for Post-Harvest
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub site: SiteConfig,
    pub comments: CommentsConfig,
    pub media: MediaConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawl pool and listing behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Number of article visits in flight at once
    pub concurrency: usize,

    /// Timeout for a single navigation (milliseconds)
    #[serde(rename = "navigation-timeout-ms")]
    pub navigation_timeout_ms: u64,

    /// Maximum number of articles taken from one listing page
    #[serde(rename = "max-listing-links")]
    pub max_listing_links: usize,

    /// How many ancestors of a listing link are searched for seed markup
    #[serde(rename = "ancestor-depth")]
    pub ancestor_depth: usize,

    /// Listing links with shorter text are ignored
    #[serde(rename = "min-link-text-len")]
    pub min_link_text_len: usize,
}

impl CrawlerConfig {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            concurrency: 2,
            navigation_timeout_ms: 30_000,
            max_listing_links: 20,
            ancestor_depth: 6,
            min_link_text_len: 5,
        }
    }
}

/// Target blog layout
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// First page of the blog listing
    #[serde(rename = "listing-url")]
    pub listing_url: String,

    /// Host suffix that in-body images must be served from
    #[serde(rename = "content-host")]
    pub content_host: String,

    /// Path fragment marking uploaded content
    #[serde(rename = "upload-path")]
    pub upload_path: String,

    /// Path fragment marking article pages
    #[serde(rename = "article-path")]
    pub article_path: String,

    /// JSON post collection endpoint
    #[serde(rename = "collection-endpoint")]
    pub collection_endpoint: String,

    /// Items requested per collection page
    #[serde(rename = "page-size")]
    pub page_size: u32,

    /// Response header carrying the total page count
    #[serde(rename = "total-pages-header")]
    pub total_pages_header: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            listing_url: "https://mitadmissions.org/blogs/".to_string(),
            content_host: "mitadmissions.org".to_string(),
            upload_path: "/wp-content/uploads/".to_string(),
            article_path: "/blogs/entry/".to_string(),
            collection_endpoint: "https://mitadmissions.org/wp-json/wp/v2/posts".to_string(),
            page_size: 100,
            total_pages_header: "x-wp-totalpages".to_string(),
        }
    }
}

/// Third-party discussion widget probing
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CommentsConfig {
    /// Host suffixes of the discussion widget frames
    #[serde(rename = "widget-domains")]
    pub widget_domains: Vec<String>,

    /// How long to wait for the widget frame (milliseconds)
    #[serde(rename = "widget-timeout-ms")]
    pub widget_timeout_ms: u64,

    /// Delay between frame checks (milliseconds)
    #[serde(rename = "widget-poll-interval-ms")]
    pub widget_poll_interval_ms: u64,
}

impl CommentsConfig {
    pub fn widget_timeout(&self) -> Duration {
        Duration::from_millis(self.widget_timeout_ms)
    }

    pub fn widget_poll_interval(&self) -> Duration {
        Duration::from_millis(self.widget_poll_interval_ms)
    }
}

impl Default for CommentsConfig {
    fn default() -> Self {
        Self {
            widget_domains: vec!["disqus.com".to_string()],
            widget_timeout_ms: 5_000,
            widget_poll_interval_ms: 400,
        }
    }
}

/// Embedded media recognition
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Host suffixes of video players whose embed frames count as media
    #[serde(rename = "video-hosts")]
    pub video_hosts: Vec<String>,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            video_hosts: vec![
                "youtube.com".to_string(),
                "youtube-nocookie.com".to_string(),
                "youtu.be".to_string(),
                "vimeo.com".to_string(),
            ],
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{})",
            self.crawler_name, self.crawler_version, self.contact_url
        )
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "PostHarvest".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://github.com/post-harvest/post-harvest".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the CSV file; defaults to a file beside the executable
    pub path: Option<String>,
}

use crate::config::types::{
    CommentsConfig, Config, CrawlerConfig, MediaConfig, SiteConfig, UserAgentConfig,
    MAX_CONCURRENCY,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_site_config(&config.site)?;
    validate_comments_config(&config.comments)?;
    validate_media_config(&config.media)?;
    validate_user_agent_config(&config.user_agent)?;
    Ok(())
}

/// Returns true if `concurrency` is an accepted pool size
pub fn is_valid_concurrency(concurrency: usize) -> bool {
    (1..=MAX_CONCURRENCY).contains(&concurrency)
}

fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if !is_valid_concurrency(config.concurrency) {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, config.concurrency
        )));
    }

    if config.navigation_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "navigation-timeout-ms must be > 0".to_string(),
        ));
    }

    if config.max_listing_links < 1 {
        return Err(ConfigError::Validation(format!(
            "max-listing-links must be >= 1, got {}",
            config.max_listing_links
        )));
    }

    Ok(())
}

fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    for (name, value) in [
        ("listing-url", &config.listing_url),
        ("collection-endpoint", &config.collection_endpoint),
    ] {
        let url = Url::parse(value)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", name, value, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(format!(
                "{} '{}' must use HTTP or HTTPS",
                name, value
            )));
        }
    }

    if config.content_host.is_empty() {
        return Err(ConfigError::Validation(
            "content-host cannot be empty".to_string(),
        ));
    }

    if config.article_path.is_empty() {
        return Err(ConfigError::Validation(
            "article-path cannot be empty".to_string(),
        ));
    }

    // The collection API refuses pages larger than 100 items
    if config.page_size < 1 || config.page_size > 100 {
        return Err(ConfigError::Validation(format!(
            "page-size must be between 1 and 100, got {}",
            config.page_size
        )));
    }

    if config.total_pages_header.is_empty() {
        return Err(ConfigError::Validation(
            "total-pages-header cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_comments_config(config: &CommentsConfig) -> Result<(), ConfigError> {
    if config.widget_domains.iter().any(|d| d.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "widget-domains cannot contain empty entries".to_string(),
        ));
    }

    if config.widget_poll_interval_ms == 0 && config.widget_timeout_ms > 0 {
        return Err(ConfigError::Validation(
            "widget-poll-interval-ms must be > 0 when widget-timeout-ms is set".to_string(),
        ));
    }

    Ok(())
}

fn validate_media_config(config: &MediaConfig) -> Result<(), ConfigError> {
    if config.video_hosts.iter().any(|h| h.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "video-hosts cannot contain empty entries".to_string(),
        ));
    }
    Ok(())
}

fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;

    Ok(())
}

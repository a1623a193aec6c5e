//! Configuration module for Post-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section has defaults, so a run without a configuration file targets the
//! built-in blog.
//!
//! # Example
//!
//! ```no_run
//! use post_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Pool size: {}", config.crawler.concurrency);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CommentsConfig, Config, CrawlerConfig, MediaConfig, OutputConfig, SiteConfig,
    UserAgentConfig, MAX_CONCURRENCY,
};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default};
pub use validation::{is_valid_concurrency, validate};

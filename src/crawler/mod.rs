//! Crawler module for page loading and visit scheduling
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching and client construction
//! - The browser boundary used for article visits
//! - The bounded worker pool
//! - Overall crawl coordination

mod browser;
mod coordinator;
pub mod fetcher;
mod scheduler;

pub use browser::{Browser, FrameMatcher, HttpBrowser, HttpPage, Page, PageSnapshot};
pub use coordinator::{Coordinator, CrawlMode};
pub use fetcher::build_http_client;
pub use scheduler::Scheduler;

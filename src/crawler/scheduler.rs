//! Bounded worker pool for article visits
//!
//! Workers are futures driven together on the caller's task. Each one claims
//! the next unvisited index from a shared counter, visits that article in its
//! own page and records the row under the claimed index, so the output order
//! always matches the input order whatever order visits finish in.

use crate::article::{ArticleReference, ExtractedRecord, OutputRow};
use crate::config::Config;
use crate::crawler::browser::{Browser, Page};
use crate::extract::resolve_page;
use crate::{HarvestError, Result};
use futures::future::join_all;
use std::sync::atomic::{AtomicUsize, Ordering};
use url::Url;

/// Visits article references with a bounded number of concurrent pages
pub struct Scheduler<'a> {
    browser: &'a dyn Browser,
    config: &'a Config,
    concurrency: usize,
}

impl<'a> Scheduler<'a> {
    /// Creates a scheduler using the configured pool size
    pub fn new(browser: &'a dyn Browser, config: &'a Config) -> Self {
        Self {
            browser,
            config,
            concurrency: config.crawler.concurrency,
        }
    }

    /// Overrides the pool size (values below 1 are treated as 1)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Visits every reference and returns one row per reference, in input order
    ///
    /// A reference that cannot be visited yields a degraded row built from its
    /// seed data; it never stops the other workers.
    pub async fn run_pool(&self, items: &[ArticleReference]) -> Vec<OutputRow> {
        if items.is_empty() {
            return Vec::new();
        }

        let next = AtomicUsize::new(0);
        let worker_count = self.concurrency.max(1).min(items.len());
        tracing::debug!(
            "Visiting {} articles with {} workers",
            items.len(),
            worker_count
        );

        let workers = (0..worker_count).map(|worker| {
            let next = &next;
            async move {
                let mut finished = Vec::new();
                loop {
                    let index = next.fetch_add(1, Ordering::Relaxed);
                    let Some(reference) = items.get(index) else {
                        break;
                    };
                    tracing::debug!("Worker {} visiting [{}] {}", worker, index, reference.url);

                    let row = match self.visit(reference).await {
                        Ok(record) => OutputRow::merge(record, reference),
                        Err(e) => {
                            tracing::warn!("Failed to extract {}: {}", reference.url, e);
                            OutputRow::degraded(reference)
                        }
                    };
                    finished.push((index, row));
                }
                finished
            }
        });

        let mut slots: Vec<Option<OutputRow>> = items.iter().map(|_| None).collect();
        for (index, row) in join_all(workers).await.into_iter().flatten() {
            slots[index] = Some(row);
        }

        slots
            .into_iter()
            .zip(items)
            .map(|(slot, reference)| slot.unwrap_or_else(|| OutputRow::degraded(reference)))
            .collect()
    }

    /// Visits one article in a fresh page, closing the page afterwards
    async fn visit(&self, reference: &ArticleReference) -> Result<ExtractedRecord> {
        let url = Url::parse(&reference.url)?;
        let mut page = self.browser.new_page().await?;

        let outcome = self.load_and_resolve(page.as_mut(), &url).await;
        page.close().await;

        outcome
    }

    async fn load_and_resolve(&self, page: &mut dyn Page, url: &Url) -> Result<ExtractedRecord> {
        let snapshot = tokio::time::timeout(self.config.crawler.navigation_timeout(), page.goto(url))
            .await
            .map_err(|_| HarvestError::Timeout {
                url: url.to_string(),
            })??;

        Ok(resolve_page(page, &snapshot, self.config).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::Seed;
    use crate::crawler::browser::PageSnapshot;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;

    /// How the mock serves one URL
    #[derive(Clone)]
    enum Scripted {
        Article { delay_ms: u64, title: String },
        Fail,
    }

    #[derive(Default)]
    struct Counters {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        opened: AtomicUsize,
        closed: AtomicUsize,
    }

    struct MockBrowser {
        script: HashMap<String, Scripted>,
        counters: Arc<Counters>,
    }

    struct MockPage {
        script: HashMap<String, Scripted>,
        counters: Arc<Counters>,
    }

    #[async_trait]
    impl Browser for MockBrowser {
        async fn new_page(&self) -> Result<Box<dyn Page>> {
            self.counters.opened.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(MockPage {
                script: self.script.clone(),
                counters: Arc::clone(&self.counters),
            }))
        }
    }

    #[async_trait]
    impl Page for MockPage {
        async fn goto(&mut self, url: &Url) -> Result<PageSnapshot> {
            let now = self.counters.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.counters.peak.fetch_max(now, Ordering::SeqCst);

            let outcome = match self.script.get(url.as_str()).cloned() {
                Some(Scripted::Article { delay_ms, title }) => {
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                    Ok(PageSnapshot {
                        url: url.clone(),
                        html: format!(
                            "<html><body><h1>{}</h1><article><p>Body of {}</p></article>\
                             <span>1 Comment</span></body></html>",
                            title, title
                        ),
                    })
                }
                Some(Scripted::Fail) | None => Err(HarvestError::Browser(format!(
                    "navigation to {} failed",
                    url
                ))),
            };

            self.counters.in_flight.fetch_sub(1, Ordering::SeqCst);
            outcome
        }

        async fn frames(&mut self) -> Result<Vec<Url>> {
            Ok(Vec::new())
        }

        async fn frame_document(&mut self, frame: &Url) -> Result<String> {
            Err(HarvestError::Browser(format!("no frame {}", frame)))
        }

        async fn close(&mut self) {
            self.counters.closed.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn url(i: usize) -> String {
        format!("https://blog.example.com/blogs/entry/post-{}/", i)
    }

    fn references(count: usize) -> Vec<ArticleReference> {
        (0..count)
            .map(|i| {
                ArticleReference::with_seed(
                    url(i),
                    Seed {
                        title: Some(format!("Seed {}", i)),
                        author: Some(format!("Seed author {}", i)),
                        time: None,
                    },
                )
            })
            .collect()
    }

    fn test_config() -> Config {
        let mut config = Config::default();
        config.crawler.navigation_timeout_ms = 500;
        config.comments.widget_timeout_ms = 20;
        config.comments.widget_poll_interval_ms = 5;
        config
    }

    #[tokio::test]
    async fn test_order_preserved_and_failure_isolated() {
        // Later items finish first; item 3 fails to load
        let delays = [120, 10, 60, 0, 5];
        let mut script = HashMap::new();
        for (i, delay_ms) in delays.iter().enumerate() {
            let scripted = if i == 3 {
                Scripted::Fail
            } else {
                Scripted::Article {
                    delay_ms: *delay_ms,
                    title: format!("Post {}", i),
                }
            };
            script.insert(url(i), scripted);
        }

        let counters = Arc::new(Counters::default());
        let browser = MockBrowser {
            script,
            counters: Arc::clone(&counters),
        };
        let config = test_config();
        let items = references(5);

        let rows = Scheduler::new(&browser, &config)
            .with_concurrency(2)
            .run_pool(&items)
            .await;

        assert_eq!(rows.len(), 5);
        for (i, row) in rows.iter().enumerate() {
            if i == 3 {
                assert_eq!(row.title, "Seed 3");
                assert_eq!(row.author, "Seed author 3");
                assert_eq!(row.comment_count, 0);
                assert!(row.is_content_empty());
            } else {
                assert_eq!(row.title, format!("Post {}", i));
                assert_eq!(row.author, format!("Seed author {}", i));
                assert_eq!(row.article_content, format!("Body of Post {}", i));
                assert_eq!(row.comment_count, 1);
            }
        }

        assert!(counters.peak.load(Ordering::SeqCst) <= 2);
        assert_eq!(counters.opened.load(Ordering::SeqCst), 5);
        assert_eq!(counters.closed.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_navigation_timeout_degrades_row() {
        let mut script = HashMap::new();
        script.insert(
            url(0),
            Scripted::Article {
                delay_ms: 2_000,
                title: "Slow".to_string(),
            },
        );
        script.insert(
            url(1),
            Scripted::Article {
                delay_ms: 0,
                title: "Fast".to_string(),
            },
        );

        let counters = Arc::new(Counters::default());
        let browser = MockBrowser {
            script,
            counters: Arc::clone(&counters),
        };
        let mut config = test_config();
        config.crawler.navigation_timeout_ms = 50;
        let items = references(2);

        let rows = Scheduler::new(&browser, &config).run_pool(&items).await;

        assert_eq!(rows[0].title, "Seed 0");
        assert!(rows[0].is_content_empty());
        assert_eq!(rows[1].title, "Fast");
        assert_eq!(counters.closed.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalid_url_degrades_row() {
        let browser = MockBrowser {
            script: HashMap::new(),
            counters: Arc::new(Counters::default()),
        };
        let config = test_config();
        let items = vec![ArticleReference::new("not a url")];

        let rows = Scheduler::new(&browser, &config).run_pool(&items).await;

        assert_eq!(rows, vec![OutputRow::default()]);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let browser = MockBrowser {
            script: HashMap::new(),
            counters: Arc::new(Counters::default()),
        };
        let config = test_config();

        let rows = Scheduler::new(&browser, &config).run_pool(&[]).await;
        assert!(rows.is_empty());
    }
}

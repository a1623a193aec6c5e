//! Post-Harvest main entry point
//!
//! This is the command-line interface for the Post-Harvest blog extractor.

use anyhow::Context;
use clap::Parser;
use post_harvest::config::{is_valid_concurrency, load_config_or_default, Config, MAX_CONCURRENCY};
use post_harvest::discovery::parse_timestamp;
use post_harvest::output::{resolve_output_path, write_csv, RunStatistics};
use post_harvest::{ArticleReference, Coordinator, CrawlMode};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Post-Harvest: a blog post extractor
///
/// Without URLs, Post-Harvest reads the first page of the blog listing and
/// extracts every article linked from it. With `--all` it enumerates the whole
/// post collection instead. Results are written as a CSV file.
#[derive(Parser, Debug)]
#[command(name = "post-harvest")]
#[command(version)]
#[command(about = "Extracts blog posts into a CSV file", long_about = None)]
struct Cli {
    /// Article URLs to extract (only http:// and https:// values are used)
    #[arg(value_name = "URL")]
    targets: Vec<String>,

    /// Comma-separated article URLs to extract
    #[arg(long = "urls", value_name = "URLS", value_delimiter = ',')]
    url_list: Vec<String>,

    /// Enumerate every post through the JSON collection endpoint
    #[arg(long)]
    all: bool,

    /// Only posts published at or after this time (with --all)
    #[arg(long, value_name = "TIMESTAMP")]
    since: Option<String>,

    /// Number of articles visited at once (1-10)
    #[arg(long, value_name = "N", allow_hyphen_values = true)]
    concurrency: Option<String>,

    /// Output CSV path
    #[arg(long, value_name = "PATH")]
    out: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Show the articles that would be visited without visiting them
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    /// Explicit URLs from positional arguments and `--urls`, in that order
    fn explicit_urls(&self) -> Vec<String> {
        let positional = self.targets.iter().filter_map(|arg| {
            if is_http_url(arg) {
                Some(arg.clone())
            } else {
                tracing::warn!("Ignoring argument {:?}: not an http(s) URL", arg);
                None
            }
        });
        let listed = self
            .url_list
            .iter()
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());

        positional.chain(listed).collect()
    }

    /// Picks the crawl mode: explicit URLs, then `--all`, then the listing page
    fn crawl_mode(&self) -> anyhow::Result<CrawlMode> {
        let urls = self.explicit_urls();
        if !urls.is_empty() {
            if self.since.is_some() {
                tracing::warn!("--since only applies to --all and is ignored");
            }
            return Ok(CrawlMode::Explicit(urls));
        }

        if self.all {
            let since = self
                .since
                .as_deref()
                .map(parse_timestamp)
                .transpose()
                .context("invalid --since value")?;
            return Ok(CrawlMode::FullCorpus { since });
        }

        Ok(CrawlMode::Listing)
    }

    /// Applies command-line overrides on top of the loaded configuration
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(raw) = &self.concurrency {
            match raw.trim().parse::<usize>() {
                Ok(n) if is_valid_concurrency(n) => config.crawler.concurrency = n,
                _ => tracing::warn!(
                    "Ignoring --concurrency {:?}: expected 1-{}, keeping {}",
                    raw,
                    MAX_CONCURRENCY,
                    config.crawler.concurrency
                ),
            }
        }

        if let Some(out) = &self.out {
            config.output.path = Some(out.to_string_lossy().into_owned());
        }
    }
}

fn is_http_url(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = load_config_or_default(cli.config.as_deref()).with_context(|| {
        match &cli.config {
            Some(path) => format!("failed to load configuration from {}", path.display()),
            None => "invalid built-in configuration".to_string(),
        }
    })?;
    cli.apply_overrides(&mut config);

    let mode = cli.crawl_mode()?;
    let coordinator = Coordinator::new(config)?;

    if cli.dry_run {
        let references = coordinator.references(mode).await?;
        print_dry_run(coordinator.config(), &references);
        return Ok(());
    }

    let rows = coordinator.run(mode).await?;
    RunStatistics::from_rows(&rows).log();

    let path = resolve_output_path(coordinator.config().output.path.as_deref());
    write_csv(&path, &rows).with_context(|| format!("failed to write {}", path.display()))?;

    println!("Saved {} rows to: {}", rows.len(), path.display());
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("post_harvest=info,warn"),
            1 => EnvFilter::new("post_harvest=debug,info"),
            2 => EnvFilter::new("post_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Handles --dry-run: shows the settings and the articles that would be visited
fn print_dry_run(config: &Config, references: &[ArticleReference]) {
    println!("=== Post-Harvest Dry Run ===\n");

    println!("Crawler:");
    println!("  Concurrency: {}", config.crawler.concurrency);
    println!(
        "  Navigation timeout: {}ms",
        config.crawler.navigation_timeout_ms
    );
    println!("  User agent: {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!(
        "  CSV: {}",
        resolve_output_path(config.output.path.as_deref()).display()
    );

    println!("\nArticles ({}):", references.len());
    for reference in references {
        match &reference.seed.title {
            Some(title) => println!("  - {} ({})", reference.url, title),
            None => println!("  - {}", reference.url),
        }
    }
}

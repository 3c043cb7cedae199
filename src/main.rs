//! Review-Harvest main entry point
//!
//! This is the command-line interface for the Review-Harvest review collector.

use anyhow::{bail, Context};
use clap::Parser;
use review_harvest::config::{load_config_with_hash, validate, Config};
use review_harvest::crawler::{read_url_list, run_batch, Crawler};
use review_harvest::output::{save_report, CsvOutputHandler};
use review_harvest::session::SessionManager;
use review_harvest::url::{ensure_reviews_suffix, parse_review_url};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Review-Harvest: collects critic reviews from a dynamically loaded review list
///
/// Review-Harvest opens the review page in an automated browser, keeps
/// clicking "Load More" until the list stops growing, and saves every unique
/// review to a CSV file.
#[derive(Parser, Debug)]
#[command(name = "review-harvest")]
#[command(version = "1.0.0")]
#[command(about = "Collects critic reviews into CSV", long_about = None)]
struct Cli {
    /// Review page URL, or a file of URLs with --batch
    #[arg(value_name = "TARGET")]
    target: String,

    /// Treat TARGET as a file with one URL per line
    #[arg(long)]
    batch: bool,

    /// Path to TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Stop after collecting this many reviews
    #[arg(long)]
    max_reviews: Option<usize>,

    /// Minimum pause between "Load More" clicks (seconds)
    #[arg(long)]
    min_delay: Option<f64>,

    /// Maximum pause between "Load More" clicks (seconds)
    #[arg(long)]
    max_delay: Option<f64>,

    /// Pause after scrolling to the bottom (seconds)
    #[arg(long)]
    scroll_delay: Option<f64>,

    /// Maximum number of "Load More" clicks
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Directory for the CSV files
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Show the browser window
    #[arg(long)]
    visible: bool,

    /// Movie title to use in the output filename
    #[arg(long, conflicts_with = "batch")]
    title: Option<String>,

    /// Validate config and show what would be crawled without opening a browser
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    /// Layers command-line flags over the file configuration
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(max) = self.max_reviews {
            config.crawl.max_reviews = Some(max);
        }
        if let Some(delay) = self.min_delay {
            config.crawl.min_delay = delay;
        }
        if let Some(delay) = self.max_delay {
            config.crawl.max_delay = delay;
        }
        if let Some(delay) = self.scroll_delay {
            config.crawl.scroll_delay = delay;
        }
        if let Some(attempts) = self.max_attempts {
            config.crawl.max_attempts = attempts;
        }
        if let Some(dir) = &self.output {
            config.output.directory = dir.clone();
        }
        if self.visible {
            config.browser.headless = false;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    cli.apply_overrides(&mut config);
    validate(&config).context("Invalid configuration")?;

    let urls = if cli.batch {
        let path = PathBuf::from(&cli.target);
        let urls = read_url_list(&path)
            .with_context(|| format!("Failed to read URL list {}", path.display()))?;
        if urls.is_empty() {
            bail!("No URLs found in {}", path.display());
        }
        urls
    } else {
        vec![cli.target.clone()]
    };

    if cli.dry_run {
        handle_dry_run(&config, &urls);
        return Ok(());
    }

    if cli.batch {
        handle_batch(&config, &urls).await
    } else {
        handle_single(&config, &cli.target, cli.title.as_deref()).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("review_harvest=info,warn"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the resolved configuration and targets
fn handle_dry_run(config: &Config, urls: &[String]) {
    println!("=== Review-Harvest Dry Run ===\n");

    println!("Crawl:");
    match config.crawl.max_reviews {
        Some(max) => println!("  Max reviews: {}", max),
        None => println!("  Max reviews: unlimited"),
    }
    println!("  Max attempts: {}", config.crawl.max_attempts);
    println!(
        "  Max consecutive failures: {}",
        config.crawl.max_consecutive_failures
    );
    println!(
        "  Click delay: {:.1}s - {:.1}s",
        config.crawl.min_delay, config.crawl.max_delay
    );
    println!("  Scroll delay: {:.1}s", config.crawl.scroll_delay);

    println!("\nBrowser:");
    println!("  Headless: {}", config.browser.headless);
    println!(
        "  Window: {}x{}",
        config.browser.window_width, config.browser.window_height
    );

    println!("\nLoad-more locators ({}):", config.selectors.load_more.len());
    for locator in &config.selectors.load_more {
        match &locator.text {
            Some(text) => println!("  - {} (text \"{}\")", locator.css, text),
            None => println!("  - {}", locator.css),
        }
    }

    println!("\nOutput directory: {}", config.output.directory.display());

    println!("\nTargets ({}):", urls.len());
    for url in urls {
        println!("  - {}", ensure_reviews_suffix(url));
    }
    if urls.len() > 1 {
        println!(
            "  Pause between movies: {:.0}s - {:.0}s",
            config.batch.min_delay, config.batch.max_delay
        );
    }

    println!("\n✓ Configuration is valid");
}

/// Handles a single review page
async fn handle_single(config: &Config, target: &str, title: Option<&str>) -> anyhow::Result<()> {
    let url = parse_review_url(&ensure_reviews_suffix(target))?;

    let manager = SessionManager::new(config.browser.clone());
    let crawler = Crawler::from_config(config);
    let report = manager.crawl(&crawler, url.as_str()).await?;

    if report.is_failed() {
        bail!("Review list at {} never loaded", report.url);
    }
    if report.is_empty() {
        bail!("No reviews collected from {}", report.url);
    }

    let handler = CsvOutputHandler::new(&config.output.directory);
    let path = save_report(&handler, &report, title)?;

    println!(
        "✓ Saved {} reviews to {}",
        report.len(),
        path.display()
    );
    Ok(())
}

/// Handles --batch mode
async fn handle_batch(config: &Config, urls: &[String]) -> anyhow::Result<()> {
    for url in urls {
        parse_review_url(&ensure_reviews_suffix(url))
            .with_context(|| format!("Invalid URL in list: {}", url))?;
    }

    let manager = SessionManager::new(config.browser.clone());
    let crawler = Crawler::from_config(config);
    let handler = CsvOutputHandler::new(&config.output.directory);

    let report = run_batch(urls, &manager, &crawler, &handler, &config.batch).await;

    match report.write_log(&config.output.directory, chrono::Local::now().naive_local()) {
        Ok(path) => println!("Batch results written to {}", path.display()),
        Err(e) => tracing::warn!("Failed to write batch results log: {}", e),
    }

    println!(
        "✓ {} of {} movies saved to {}",
        report.saved.len(),
        report.total(),
        config.output.directory.display()
    );

    if report.saved.is_empty() {
        bail!("No reviews collected from any URL");
    }
    Ok(())
}

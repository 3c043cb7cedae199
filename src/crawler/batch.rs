//! Sequential crawl of a list of review pages

use crate::config::BatchConfig;
use crate::crawler::controller::random_delay;
use crate::crawler::Crawler;
use crate::output::{save_report, OutputHandler, TIMESTAMP_FORMAT};
use crate::session::SessionManager;
use crate::url::ensure_reviews_suffix;
use crate::ScrapeError;
use chrono::NaiveDateTime;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::time::sleep;

/// Reads one URL per line, skipping blank lines and `#` comments
pub fn read_url_list(path: &Path) -> std::io::Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    Ok(parse_url_list(&content))
}

pub fn parse_url_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Outcome of a batch run
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Listing URL and the file its reviews went to
    pub saved: Vec<(String, PathBuf)>,

    /// Listing URL and why it produced nothing
    pub failed: Vec<(String, String)>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.saved.len() + self.failed.len()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }

    /// Plain-text summary of the run, one line per URL
    pub fn summary(&self, finished_at: NaiveDateTime) -> String {
        let mut text = String::new();
        let _ = writeln!(
            text,
            "Batch finished at {}",
            finished_at.format("%Y-%m-%d %H:%M:%S")
        );
        let _ = writeln!(text, "Total URLs: {}", self.total());
        let _ = writeln!(text, "Saved: {}", self.saved.len());
        let _ = writeln!(text, "Failed: {}", self.failed.len());

        if !self.saved.is_empty() {
            text.push('\n');
        }
        for (url, path) in &self.saved {
            let _ = writeln!(text, "SAVED  {} -> {}", url, path.display());
        }

        if !self.failed.is_empty() {
            text.push('\n');
        }
        for (url, reason) in &self.failed {
            let _ = writeln!(text, "FAILED {} ({})", url, reason);
        }

        text
    }

    /// Writes the summary to `batch_results_<timestamp>.log` in `directory`
    pub fn write_log(&self, directory: &Path, finished_at: NaiveDateTime) -> std::io::Result<PathBuf> {
        fs::create_dir_all(directory)?;
        let path = directory.join(format!(
            "batch_results_{}.log",
            finished_at.format(TIMESTAMP_FORMAT)
        ));
        fs::write(&path, self.summary(finished_at))?;
        Ok(path)
    }
}

/// Crawls every URL in turn, each in its own browser session
///
/// A failing URL is recorded and the batch moves on. Between two URLs the
/// runner sleeps for a random delay drawn from `pacing`.
pub async fn run_batch(
    urls: &[String],
    manager: &SessionManager,
    crawler: &Crawler,
    handler: &dyn OutputHandler,
    pacing: &BatchConfig,
) -> BatchReport {
    let mut report = BatchReport::default();

    for (index, raw) in urls.iter().enumerate() {
        let url = ensure_reviews_suffix(raw);
        tracing::info!("[{}/{}] Processing {}", index + 1, urls.len(), url);

        match crawl_and_save(&url, manager, crawler, handler).await {
            Ok(path) => {
                tracing::info!("[{}/{}] Saved {}", index + 1, urls.len(), path.display());
                report.saved.push((url, path));
            }
            Err(e) => {
                tracing::error!("[{}/{}] Failed {}: {}", index + 1, urls.len(), url, e);
                report.failed.push((url, e.to_string()));
            }
        }

        if index + 1 < urls.len() {
            let delay = random_delay(pacing.min_delay, pacing.max_delay);
            tracing::info!("Waiting {:.0}s before the next movie", delay.as_secs_f64());
            sleep(delay).await;
        }
    }

    tracing::info!(
        "Batch finished: {} saved, {} failed, {} total",
        report.saved.len(),
        report.failed.len(),
        report.total()
    );
    for (url, reason) in &report.failed {
        tracing::warn!("  {} ({})", url, reason);
    }

    report
}

async fn crawl_and_save(
    url: &str,
    manager: &SessionManager,
    crawler: &Crawler,
    handler: &dyn OutputHandler,
) -> Result<PathBuf, ScrapeError> {
    let crawl = manager.crawl(crawler, url).await?;

    if crawl.is_empty() {
        return Err(ScrapeError::NoReviews {
            url: url.to_string(),
        });
    }

    Ok(save_report(handler, &crawl, None)?)
}

//! Output module for persisting collected reviews
//!
//! This module handles:
//! - Resolving the best available movie title
//! - Building safe, timestamped filenames
//! - Writing review lists as CSV
//! - Reporting the data quality of what was collected

mod csv_output;
mod filename;
pub mod stats;
mod title;
mod traits;

pub use csv_output::{write_csv, CsvOutputHandler};
pub use filename::{clean_filename, review_filename, TIMESTAMP_FORMAT};
pub use stats::{log_data_quality, DataQuality};
pub use title::{resolve_title, ResolvedTitle, TitleSource, DEFAULT_TITLE};
pub use traits::{OutputError, OutputHandler, OutputResult, ReviewBatch};

use crate::crawler::CrawlReport;
use std::path::PathBuf;

/// Saves a crawl report through `handler`
///
/// The title comes from `explicit_title`, then the title seen on the page,
/// then the movie URL. A data-quality summary is logged before writing.
pub fn save_report(
    handler: &dyn OutputHandler,
    report: &CrawlReport,
    explicit_title: Option<&str>,
) -> OutputResult<PathBuf> {
    let title = resolve_title(explicit_title, report.title.as_deref(), &report.url);
    tracing::info!("Using {} title: {}", title.source, title.title);

    log_data_quality(&DataQuality::measure(&report.reviews));

    handler.write_reviews(&ReviewBatch {
        reviews: &report.reviews,
        title: &title,
        release_date: report.release_date.as_deref(),
    })
}

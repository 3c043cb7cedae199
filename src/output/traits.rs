//! Output handler traits and types
//!
//! This module defines the trait interface for review writers and the
//! errors they report.

use crate::output::title::ResolvedTitle;
use crate::review::ReviewRecord;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("No reviews to save")]
    Empty,

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// One movie's reviews, ready to be persisted
#[derive(Debug, Clone)]
pub struct ReviewBatch<'a> {
    pub reviews: &'a [ReviewRecord],

    /// Title after the fallback chain has been applied
    pub title: &'a ResolvedTitle,

    /// Canonical release date, if the page showed one
    pub release_date: Option<&'a str>,
}

/// Trait for review writers
pub trait OutputHandler {
    /// Persists a batch of reviews
    ///
    /// # Returns
    ///
    /// * `Ok(PathBuf)` - Where the reviews were written
    /// * `Err(OutputError)` - The batch was empty or could not be written
    fn write_reviews(&self, batch: &ReviewBatch<'_>) -> OutputResult<PathBuf>;
}

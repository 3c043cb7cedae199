//! CSV writer for review lists

use crate::output::filename::review_filename;
use crate::output::traits::{OutputError, OutputHandler, OutputResult, ReviewBatch};
use crate::review::ReviewRecord;
use chrono::Local;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Writes each batch to a new timestamped CSV file in one directory
pub struct CsvOutputHandler {
    directory: PathBuf,
}

impl CsvOutputHandler {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl OutputHandler for CsvOutputHandler {
    fn write_reviews(&self, batch: &ReviewBatch<'_>) -> OutputResult<PathBuf> {
        if batch.reviews.is_empty() {
            return Err(OutputError::Empty);
        }

        fs::create_dir_all(&self.directory)?;

        let title = (!batch.title.is_default()).then_some(batch.title.title.as_str());
        if title.is_none() {
            tracing::warn!("Could not determine movie title, using generic filename");
        }

        let filename = review_filename(title, batch.release_date, Local::now().naive_local());
        let path = self.directory.join(filename);

        let file = fs::File::create(&path)?;
        write_csv(file, batch.reviews)?;

        tracing::info!("Saved {} reviews to '{}'", batch.reviews.len(), path.display());
        Ok(path)
    }
}

/// Serializes reviews with a header row, in the fixed column order
pub fn write_csv<W: io::Write>(writer: W, reviews: &[ReviewRecord]) -> OutputResult<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for review in reviews {
        writer.serialize(review)?;
    }
    writer.flush()?;
    Ok(())
}

//! Data-quality summary of a collected review list
//!
//! Counts how many reviews fell back to the "unknown" default for the
//! fields that matter most downstream.

use crate::review::{ReviewRecord, Sentiment, DEFAULT_CRITIC, DEFAULT_DATE, DEFAULT_PUBLICATION};

/// Unknown-field counts over one review list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DataQuality {
    pub total: usize,
    pub unknown_critics: usize,
    pub unknown_publications: usize,
    pub unknown_dates: usize,
    pub unknown_scores: usize,
}

impl DataQuality {
    pub fn measure(reviews: &[ReviewRecord]) -> Self {
        let count = |unknown: fn(&ReviewRecord) -> bool| reviews.iter().filter(|r| unknown(r)).count();

        Self {
            total: reviews.len(),
            unknown_critics: count(|r| r.critic == DEFAULT_CRITIC),
            unknown_publications: count(|r| r.publication == DEFAULT_PUBLICATION),
            unknown_dates: count(|r| r.date == DEFAULT_DATE),
            unknown_scores: count(|r| r.sentiment == Sentiment::Unknown),
        }
    }

    /// Share of the list that `count` represents, in percent
    pub fn percentage(&self, count: usize) -> f64 {
        if self.total > 0 {
            (count as f64 / self.total as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Field label and unknown count, in display order
    pub fn fields(&self) -> [(&'static str, usize); 4] {
        [
            ("Critics", self.unknown_critics),
            ("Publications", self.unknown_publications),
            ("Dates", self.unknown_dates),
            ("Scores", self.unknown_scores),
        ]
    }
}

/// Logs the unknown-field counts at info level
pub fn log_data_quality(quality: &DataQuality) {
    tracing::info!("Data quality check:");
    for (field, count) in quality.fields() {
        tracing::info!(
            "- {} unknown: {}/{} ({:.1}%)",
            field,
            count,
            quality.total,
            quality.percentage(count)
        );
    }
}

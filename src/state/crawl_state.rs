use crate::review::{ReviewIdentity, ReviewRecord};
use std::collections::HashSet;

/// Mutable state of one crawl run
///
/// Created when a crawl starts, updated once per cycle and consumed into the
/// final report. Never shared between runs.
#[derive(Debug, Clone, Default)]
pub struct CrawlState {
    /// Unique reviews in the order they were first seen
    reviews: Vec<ReviewRecord>,

    /// Identities of every review in `reviews`
    seen: HashSet<ReviewIdentity>,

    /// Number of "load more" activations attempted so far
    pub attempts: u32,

    /// Cycles in a row that added nothing or failed to click
    pub consecutive_failures: u32,

    /// Review count after the last cycle that grew the list
    pub last_count: usize,
}

impl CrawlState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a review unless one with the same identity was already kept
    ///
    /// Returns true if the review was new.
    pub fn absorb(&mut self, record: ReviewRecord) -> bool {
        if !self.seen.insert(ReviewIdentity::of(&record)) {
            return false;
        }
        self.reviews.push(record);
        true
    }

    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }

    pub fn reviews(&self) -> &[ReviewRecord] {
        &self.reviews
    }

    /// Records a cycle that added reviews; clears the failure streak
    pub fn record_growth(&mut self) {
        self.consecutive_failures = 0;
        self.last_count = self.reviews.len();
    }

    /// Records a cycle that made no progress and returns the new streak length
    pub fn record_failure(&mut self) -> u32 {
        self.consecutive_failures += 1;
        self.consecutive_failures
    }

    pub fn into_reviews(self) -> Vec<ReviewRecord> {
        self.reviews
    }
}

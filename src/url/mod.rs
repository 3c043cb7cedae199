//! URL handling module for Review-Harvest
//!
//! This module turns user-supplied movie URLs into review-listing URLs and
//! derives a best-effort movie title from a URL when the page offers none.

mod normalize;
mod title;

// Re-export main functions
pub use normalize::{ensure_reviews_suffix, parse_review_url};
pub use title::title_from_url;

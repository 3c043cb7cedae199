//! Review data model
//!
//! - `ReviewRecord`: one critic review, always fully populated
//! - `Sentiment`: the fresh/rotten tag attached to a review
//! - `ReviewIdentity`: the heuristic key used to drop duplicate rows

mod identity;
mod record;

pub use identity::{ReviewIdentity, IDENTITY_TEXT_PREFIX};
pub use record::{
    ReviewRecord, Sentiment, CSV_HEADERS, DEFAULT_CRITIC, DEFAULT_DATE, DEFAULT_PUBLICATION,
    DEFAULT_TEXT,
};

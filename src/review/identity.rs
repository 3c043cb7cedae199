use crate::review::ReviewRecord;

/// Number of leading review-text characters that take part in identity
pub const IDENTITY_TEXT_PREFIX: usize = 50;

/// Deduplication key for a review
///
/// Two reviews with the same critic, publication, date and first 50 characters
/// of text are treated as the same review. This is a heuristic: distinct reviews
/// can collide and a single review can split if its text shifts near the cut.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReviewIdentity {
    critic: String,
    publication: String,
    date: String,
    text_prefix: String,
}

impl ReviewIdentity {
    pub fn of(record: &ReviewRecord) -> Self {
        Self {
            critic: record.critic.clone(),
            publication: record.publication.clone(),
            date: record.date.clone(),
            text_prefix: record.text.chars().take(IDENTITY_TEXT_PREFIX).collect(),
        }
    }
}

impl From<&ReviewRecord> for ReviewIdentity {
    fn from(record: &ReviewRecord) -> Self {
        Self::of(record)
    }
}

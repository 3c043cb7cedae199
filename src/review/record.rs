use serde::Serialize;
use std::fmt;

pub const DEFAULT_CRITIC: &str = "Unknown";
pub const DEFAULT_PUBLICATION: &str = "Unknown";
pub const DEFAULT_TEXT: &str = "No text available";
pub const DEFAULT_DATE: &str = "Unknown";

/// Column order of the tabular output; downstream consumers rely on it
pub const CSV_HEADERS: [&str; 8] = [
    "Critic",
    "Publication",
    "Review Text",
    "Review Score",
    "Original Score",
    "Date",
    "URL",
    "Movie URL",
];

/// Fresh/rotten classification of a single review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    #[default]
    Unknown,
}

impl Sentiment {
    /// Parses the score icon's sentiment attribute (case-insensitive)
    pub fn from_attribute(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "positive" | "fresh" => Self::Positive,
            "negative" | "rotten" => Self::Negative,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One critic review as rendered on the listing page
///
/// Every field is always present; values that could not be read carry the
/// documented defaults instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewRecord {
    #[serde(rename = "Critic")]
    pub critic: String,

    #[serde(rename = "Publication")]
    pub publication: String,

    #[serde(rename = "Review Text")]
    pub text: String,

    #[serde(rename = "Review Score")]
    pub sentiment: Sentiment,

    /// Numeric or letter grade from the original publication, may be empty
    #[serde(rename = "Original Score")]
    pub original_score: String,

    /// Review date exactly as rendered by the site
    #[serde(rename = "Date")]
    pub date: String,

    /// Permalink to the full review, may be empty
    #[serde(rename = "URL")]
    pub url: String,

    /// Review listing the record was collected from
    #[serde(rename = "Movie URL")]
    pub movie_url: String,
}

impl ReviewRecord {
    /// A record holding nothing but defaults, for the given listing URL
    pub fn placeholder(movie_url: &str) -> Self {
        Self {
            critic: DEFAULT_CRITIC.to_string(),
            publication: DEFAULT_PUBLICATION.to_string(),
            text: DEFAULT_TEXT.to_string(),
            sentiment: Sentiment::Unknown,
            original_score: String::new(),
            date: DEFAULT_DATE.to_string(),
            url: String::new(),
            movie_url: movie_url.to_string(),
        }
    }
}

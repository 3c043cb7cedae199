//! Review-Harvest: an incremental critic-review collector
//!
//! This crate drives a JavaScript-rendered, paginated review list to completion
//! through a page-automation session, deduplicating reviews as they appear and
//! deciding when the list is exhausted.

pub mod config;
pub mod crawler;
pub mod output;
pub mod review;
pub mod session;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Review-Harvest operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No reviews collected from {url}")]
    NoReviews { url: String },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Failures reported by a page-automation session
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    #[error("No element matches selector '{selector}'")]
    NotFound { selector: String },

    #[error("Element reference is stale")]
    StaleElement,

    #[error("Click was intercepted: {0}")]
    ClickIntercepted(String),

    #[error("Timed out waiting for {0}")]
    Timeout(String),

    #[error("Script failed: {0}")]
    Script(String),

    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Browser connection lost: {0}")]
    Disconnected(String),
}

impl SessionError {
    /// Returns true if the crawl may keep going after this failure
    ///
    /// Launch and disconnect failures leave no usable page behind; everything
    /// else is a page-level hiccup that the crawl loop absorbs.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Launch(_) | Self::Disconnected(_))
    }

    /// Returns true if the page changed underneath a held element reference
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::StaleElement)
    }
}

/// A review row that could not be turned into a record
#[derive(Debug, Clone, Error)]
#[error("Failed to extract review row {index}: {source}")]
pub struct ExtractionError {
    pub index: usize,
    #[source]
    pub source: SessionError,
}

/// Result type alias for Review-Harvest operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

/// Result type alias for session operations
pub type SessionResult<T> = std::result::Result<T, SessionError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlReport, Crawler};
pub use review::{ReviewIdentity, ReviewRecord, Sentiment};
pub use state::{CrawlPhase, CrawlState, StopReason};
pub use url::ensure_reviews_suffix;

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Review-Harvest
///
/// Every section has defaults, so an empty TOML file is a valid configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawl: CrawlConfig,
    pub browser: BrowserConfig,
    pub selectors: SelectorConfig,
    pub output: OutputConfig,
    pub batch: BatchConfig,
}

/// Crawl loop behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlConfig {
    /// Stop once this many unique reviews are collected (unbounded if absent)
    pub max_reviews: Option<usize>,

    /// Lower bound of the randomized pause after each "load more" click (seconds)
    pub min_delay: f64,

    /// Upper bound of the randomized pause after each "load more" click (seconds)
    pub max_delay: f64,

    /// Pause after scrolling to the bottom of the page (seconds)
    pub scroll_delay: f64,

    /// Maximum number of "load more" activations per crawl
    pub max_attempts: u32,

    /// Consecutive cycles without new reviews before the list is assumed exhausted
    pub max_consecutive_failures: u32,

    /// How long to wait for the first review row after navigation (seconds)
    pub load_timeout: f64,

    /// How long each locator may wait for the "load more" control (seconds)
    pub control_timeout: f64,

    /// Shortened wait used on the fallback search for the control (seconds)
    pub control_retry_timeout: f64,

    /// Number of scans the harvester makes before giving up on a pass
    pub harvest_retries: u32,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_reviews: None,
            min_delay: 1.0,
            max_delay: 3.0,
            scroll_delay: 1.0,
            max_attempts: 25,
            max_consecutive_failures: 3,
            load_timeout: 20.0,
            control_timeout: 10.0,
            control_retry_timeout: 5.0,
            harvest_retries: 3,
        }
    }
}

impl CrawlConfig {
    pub fn scroll_pause(&self) -> Duration {
        seconds(self.scroll_delay)
    }

    pub fn load_wait(&self) -> Duration {
        seconds(self.load_timeout)
    }

    pub fn control_wait(&self) -> Duration {
        seconds(self.control_timeout)
    }

    pub fn control_retry_wait(&self) -> Duration {
        seconds(self.control_retry_timeout)
    }

    /// Returns true once `count` reviews satisfy the configured ceiling
    pub fn review_ceiling_reached(&self, count: usize) -> bool {
        self.max_reviews.is_some_and(|max| count >= max)
    }
}

/// Converts a seconds value to a `Duration`
///
/// Negative and NaN values become zero, values too large for a `Duration`
/// saturate instead of panicking.
pub fn seconds(value: f64) -> Duration {
    Duration::try_from_secs_f64(value.max(0.0)).unwrap_or(Duration::MAX)
}

/// Automated browser setup
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BrowserConfig {
    /// Run without a visible window
    pub headless: bool,

    /// User agent presented to the site
    pub user_agent: String,

    /// Fixed window and viewport width (pixels)
    pub window_width: u32,

    /// Fixed window and viewport height (pixels)
    pub window_height: u32,

    /// Explicit Chrome/Chromium binary; auto-detected when absent
    pub chrome_executable: Option<PathBuf>,

    /// Additional command-line switches passed to the browser
    pub extra_args: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/100.0.4896.127 Safari/537.36"
                .to_string(),
            window_width: 1366,
            window_height: 768,
            chrome_executable: None,
            extra_args: Vec::new(),
        }
    }
}

/// One strategy for locating the "load more" control
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Locator {
    /// CSS selector for candidate elements
    pub css: String,

    /// Only accept candidates whose rendered text contains this string
    #[serde(default)]
    pub text: Option<String>,
}

impl Locator {
    pub fn css(css: &str) -> Self {
        Self {
            css: css.to_string(),
            text: None,
        }
    }

    pub fn with_text(css: &str, text: &str) -> Self {
        Self {
            css: css.to_string(),
            text: Some(text.to_string()),
        }
    }
}

/// CSS selectors describing the review page's markup
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SelectorConfig {
    pub review_row: String,
    pub critic: String,
    pub publication: String,
    pub review_text: String,
    pub score_icon: String,
    pub score_attribute: String,
    pub review_date: String,
    pub review_link: String,
    pub original_score: String,
    pub page_title: String,

    /// Ordered locator strategies for the "load more" control
    pub load_more: Vec<Locator>,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            review_row: ".review-row".to_string(),
            critic: ".display-name".to_string(),
            publication: ".publication".to_string(),
            review_text: ".review-text".to_string(),
            score_icon: "score-icon-critics".to_string(),
            score_attribute: "sentiment".to_string(),
            review_date: "span[data-qa='review-date']".to_string(),
            review_link: ".full-url".to_string(),
            original_score: ".original-score-and-url".to_string(),
            page_title: ".sidebar-title".to_string(),
            load_more: vec![
                Locator::css(
                    "rt-button[class*='load-more-button'], rt-button[data-qa='load-more-btn']",
                ),
                Locator::css("div[class*='load-more-container'] rt-button"),
                Locator::with_text("button", "Load More"),
                Locator::css("div[class*='load-more'] button"),
            ],
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Directory receiving the review CSV files
    pub directory: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("reviews"),
        }
    }
}

/// Batch run pacing
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BatchConfig {
    /// Lower bound of the pause between two movies (seconds)
    pub min_delay: f64,

    /// Upper bound of the pause between two movies (seconds)
    pub max_delay: f64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            min_delay: 60.0,
            max_delay: 180.0,
        }
    }
}

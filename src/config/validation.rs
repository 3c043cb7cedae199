use crate::config::types::{
    BatchConfig, BrowserConfig, Config, CrawlConfig, OutputConfig, SelectorConfig,
};
use crate::ConfigError;

/// Longest pause or timeout accepted anywhere in the configuration (seconds)
pub const MAX_WAIT_SECS: f64 = 86_400.0;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawl_config(&config.crawl)?;
    validate_browser_config(&config.browser)?;
    validate_selectors(&config.selectors)?;
    validate_output_config(&config.output)?;
    validate_batch_config(&config.batch)?;
    Ok(())
}

/// Validates crawl loop configuration
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    validate_delay_range("crawl", config.min_delay, config.max_delay)?;

    if !(0.0..=MAX_WAIT_SECS).contains(&config.scroll_delay) {
        return Err(ConfigError::Validation(format!(
            "scroll_delay must be between 0 and {} seconds, got {}",
            MAX_WAIT_SECS, config.scroll_delay
        )));
    }

    if config.max_attempts < 1 {
        return Err(ConfigError::Validation(
            "max_attempts must be >= 1".to_string(),
        ));
    }

    if config.max_consecutive_failures < 1 {
        return Err(ConfigError::Validation(
            "max_consecutive_failures must be >= 1".to_string(),
        ));
    }

    if config.harvest_retries < 1 {
        return Err(ConfigError::Validation(
            "harvest_retries must be >= 1".to_string(),
        ));
    }

    if config.max_reviews == Some(0) {
        return Err(ConfigError::Validation(
            "max_reviews must be >= 1 when set".to_string(),
        ));
    }

    for (name, value) in [
        ("load_timeout", config.load_timeout),
        ("control_timeout", config.control_timeout),
        ("control_retry_timeout", config.control_retry_timeout),
    ] {
        if !value.is_finite() || value <= 0.0 || value > MAX_WAIT_SECS {
            return Err(ConfigError::Validation(format!(
                "{} must be > 0 and <= {} seconds, got {}",
                name, MAX_WAIT_SECS, value
            )));
        }
    }

    Ok(())
}

/// Validates browser configuration
fn validate_browser_config(config: &BrowserConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.window_width == 0 || config.window_height == 0 {
        return Err(ConfigError::Validation(format!(
            "window size must be positive, got {}x{}",
            config.window_width, config.window_height
        )));
    }

    Ok(())
}

/// Validates page selectors
fn validate_selectors(config: &SelectorConfig) -> Result<(), ConfigError> {
    let named = [
        ("review_row", &config.review_row),
        ("critic", &config.critic),
        ("publication", &config.publication),
        ("review_text", &config.review_text),
        ("score_icon", &config.score_icon),
        ("score_attribute", &config.score_attribute),
        ("review_date", &config.review_date),
        ("review_link", &config.review_link),
        ("original_score", &config.original_score),
        ("page_title", &config.page_title),
    ];

    for (name, selector) in named {
        if selector.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "selector '{}' cannot be empty",
                name
            )));
        }
    }

    if config.load_more.is_empty() {
        return Err(ConfigError::Validation(
            "at least one load-more locator is required".to_string(),
        ));
    }

    for locator in &config.load_more {
        if locator.css.trim().is_empty() {
            return Err(ConfigError::Validation(
                "load-more locator css cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates batch pacing
fn validate_batch_config(config: &BatchConfig) -> Result<(), ConfigError> {
    validate_delay_range("batch", config.min_delay, config.max_delay)
}

/// Checks that a randomized delay range is non-negative and ordered
fn validate_delay_range(section: &str, min: f64, max: f64) -> Result<(), ConfigError> {
    let in_range = |value: f64| (0.0..=MAX_WAIT_SECS).contains(&value);
    if !in_range(min) || !in_range(max) {
        return Err(ConfigError::Validation(format!(
            "{} delays must be between 0 and {} seconds, got {}..{}",
            section, MAX_WAIT_SECS, min, max
        )));
    }

    if min > max {
        return Err(ConfigError::Validation(format!(
            "{} min_delay ({}) cannot exceed max_delay ({})",
            section, min, max
        )));
    }

    Ok(())
}

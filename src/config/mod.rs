//! Configuration module for Review-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so the file is optional; command-line flags are
//! layered on top before the merged result is validated.
//!
//! # Example
//!
//! ```no_run
//! use review_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Crawler will click at most {} times", config.crawl.max_attempts);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BatchConfig, BrowserConfig, Config, CrawlConfig, Locator, OutputConfig, SelectorConfig,
};
pub use types::seconds;

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;

//! Crawler module for collecting reviews from a rendered listing
//!
//! This module contains the core collection engine, including:
//! - Review row extraction with per-field defaults
//! - Harvesting and deduplicating the rendered rows
//! - Locating and activating the "load more" control
//! - The crawl state machine and its stop conditions
//! - Sequential batch runs over a URL list

pub mod batch;
mod controller;
pub mod extractor;
mod harvester;
pub mod metadata;
mod paginator;

pub use batch::{read_url_list, run_batch, BatchReport};
pub use controller::{random_delay, CrawlReport, Crawler};
pub use extractor::{extract_review, parse_original_score, Field};
pub use harvester::harvest;
pub use metadata::{parse_release_date, read_release_date, read_title, release_label};
pub use paginator::{activate, locate_control, CLICK_JS, SCROLL_INTO_VIEW_JS};

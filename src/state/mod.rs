//! State module for tracking crawl progress
//!
//! This module provides the state owned by a single crawl run.
//!
//! # Components
//!
//! - `CrawlPhase`: Where the crawl controller is in its state machine
//! - `StopReason`: Which rule ended a run
//! - `CrawlState`: Accumulated reviews, seen identities and loop counters

mod crawl_phase;
mod crawl_state;

// Re-export main types
pub use crawl_phase::{CrawlPhase, StopReason};
pub use crawl_state::CrawlState;

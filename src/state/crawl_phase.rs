/// Crawl phase definitions for the review collection state machine
///
/// ```text
/// Initializing -> Loading -> Harvesting <-> Paginating -> Completed
///       \
///        +-> Failed
/// ```
use std::fmt;

/// Represents the current phase of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    // ===== Active Phases =====
    /// Navigating and waiting for the first review row to render
    Initializing,

    /// Reading page metadata (release date, title) before harvesting
    Loading,

    /// Scanning rendered review rows into the accumulator
    Harvesting,

    /// Locating and activating the "load more" control
    Paginating,

    // ===== Terminal Phases =====
    /// The run finished; the accumulated reviews are final
    Completed,

    /// The page never rendered a review row
    Failed,
}

impl CrawlPhase {
    /// Returns true if this is a terminal phase (no further transitions)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Returns true if the run is still in progress
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns true if moving from this phase to `next` is legal
    ///
    /// `Failed` is only reachable from `Initializing`.
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        use CrawlPhase::*;

        matches!(
            (self, next),
            (Initializing, Loading)
                | (Initializing, Failed)
                | (Loading, Harvesting)
                | (Harvesting, Paginating)
                | (Harvesting, Completed)
                | (Paginating, Harvesting)
                | (Paginating, Completed)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initializing => "initializing",
            Self::Loading => "loading",
            Self::Harvesting => "harvesting",
            Self::Paginating => "paginating",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The rule that ended a crawl run
///
/// None of these guarantee the review list is complete; they only record which
/// heuristic fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// The "load more" control could not be found, even after a fallback scroll
    ControlAbsent,

    /// Too many cycles in a row produced no new reviews or failed to click
    ConsecutiveFailures,

    /// The maximum number of "load more" activations was used up
    AttemptCeiling,

    /// The caller's maximum review count was reached
    ReviewCeiling,

    /// No review row rendered before the load timeout
    LoadTimeout,
}

impl StopReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ControlAbsent => "control_absent",
            Self::ConsecutiveFailures => "consecutive_failures",
            Self::AttemptCeiling => "attempt_ceiling",
            Self::ReviewCeiling => "review_ceiling",
            Self::LoadTimeout => "load_timeout",
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

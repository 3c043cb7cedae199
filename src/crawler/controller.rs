//! Crawl controller
//!
//! Drives one review listing from first load to completion:
//!
//! ```text
//! Initializing -> Loading -> Harvesting <-> Paginating -> Completed
//!      \
//!       -> Failed (no review row rendered in time)
//! ```
//!
//! Each cycle scrolls to the bottom, looks for the "load more" control,
//! clicks it and harvests what appeared. The loop ends when the control is
//! gone, when too many cycles in a row add nothing, when the attempt ceiling
//! is hit or when enough reviews are collected. Whichever way it ends, a
//! final harvest pass runs before the report is returned.

use crate::config::{seconds, Config, CrawlConfig, SelectorConfig};
use crate::crawler::harvester::harvest;
use crate::crawler::metadata::{read_release_date, read_title};
use crate::crawler::paginator::{activate, locate_control};
use crate::review::ReviewRecord;
use crate::session::{PageSession, ScrollPosition};
use crate::state::{CrawlPhase, CrawlState, StopReason};
use crate::url::ensure_reviews_suffix;
use crate::{Result, SessionResult};
use rand::Rng;
use std::time::Duration;
use tokio::time::sleep;

/// Pause after the first review row appears, before reading the page
pub const INITIAL_SETTLE: Duration = Duration::from_secs(2);

/// Staged waits after a click: spinner, then render
pub const SPINNER_WAIT: Duration = Duration::from_secs(1);
pub const RENDER_WAIT: Duration = Duration::from_secs(2);

/// Pauses of the scroll-reset recovery after a failed click
pub const RECOVERY_TOP_PAUSE: Duration = Duration::from_secs(1);
pub const RECOVERY_BOTTOM_PAUSE: Duration = Duration::from_secs(2);

/// Everything one crawl produced
///
/// A completed report may still be incomplete: `stop_reason` says which
/// heuristic ended the loop, but none of them proves the list was exhausted.
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Normalized listing URL that was crawled
    pub url: String,

    /// Unique reviews in first-seen order
    pub reviews: Vec<ReviewRecord>,

    /// Release date as YYYY-MM-DD when the page showed a parseable one
    pub release_date: Option<String>,

    /// Movie title as displayed on the page
    pub title: Option<String>,

    /// Final phase, either `Completed` or `Failed`
    pub phase: CrawlPhase,

    pub stop_reason: Option<StopReason>,

    /// Number of "load more" activations attempted
    pub attempts: u32,

    /// Every phase the crawl went through, in order
    pub phases: Vec<CrawlPhase>,
}

impl CrawlReport {
    pub fn is_failed(&self) -> bool {
        self.phase == CrawlPhase::Failed
    }

    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }
}

/// Ordered record of phase transitions
#[derive(Debug)]
struct PhaseTrail {
    current: CrawlPhase,
    history: Vec<CrawlPhase>,
}

impl PhaseTrail {
    fn new() -> Self {
        Self {
            current: CrawlPhase::Initializing,
            history: vec![CrawlPhase::Initializing],
        }
    }

    fn advance(&mut self, next: CrawlPhase) {
        if next == self.current {
            return;
        }
        if !self.current.can_transition_to(next) {
            tracing::warn!("Unexpected phase change {} -> {}", self.current, next);
        }
        tracing::debug!("Phase {} -> {}", self.current, next);
        self.current = next;
        self.history.push(next);
    }
}

/// Picks a uniformly random pause between `min` and `max` seconds
pub fn random_delay(min: f64, max: f64) -> Duration {
    let secs = if max > min {
        rand::rng().random_range(min..=max)
    } else {
        min
    };
    seconds(secs)
}

/// Passes through fatal session errors and logs the rest
fn tolerate(result: SessionResult<()>, action: &str) -> SessionResult<()> {
    match result {
        Err(e) if e.is_retryable() => {
            tracing::debug!("Ignoring failed {}: {}", action, e);
            Ok(())
        }
        other => other,
    }
}

/// Crawls review listings with a fixed loop policy and page markup
#[derive(Debug, Clone)]
pub struct Crawler {
    config: CrawlConfig,
    selectors: SelectorConfig,
}

impl Crawler {
    pub fn new(config: CrawlConfig, selectors: SelectorConfig) -> Self {
        Self { config, selectors }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.crawl.clone(), config.selectors.clone())
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    /// Crawls `url` to completion, then closes `session`
    ///
    /// The session is closed on every path, including errors. A page that
    /// never renders a review row yields a `Failed` report rather than an
    /// error; only fatal session failures are returned as `Err`.
    pub async fn run<S: PageSession>(&self, mut session: S, url: &str) -> Result<CrawlReport> {
        let outcome = self.drive(&mut session, url).await;

        match session.close().await {
            Ok(()) => tracing::debug!("Session closed"),
            Err(e) => tracing::warn!("Failed to close session cleanly: {}", e),
        }

        outcome
    }

    async fn drive<S: PageSession>(&self, session: &mut S, url: &str) -> Result<CrawlReport> {
        let url = ensure_reviews_suffix(url);
        let mut phases = PhaseTrail::new();
        let mut state = CrawlState::new();

        tracing::info!("Loading {}", url);
        session.navigate(&url).await?;

        let rendered = session
            .wait_until_present(&self.selectors.review_row, self.config.load_wait())
            .await?;

        if !rendered {
            tracing::error!(
                "Timed out after {:.0}s waiting for reviews at {}",
                self.config.load_timeout,
                url
            );
            phases.advance(CrawlPhase::Failed);
            return Ok(CrawlReport {
                url,
                reviews: Vec::new(),
                release_date: None,
                title: None,
                phase: phases.current,
                stop_reason: Some(StopReason::LoadTimeout),
                attempts: 0,
                phases: phases.history,
            });
        }

        phases.advance(CrawlPhase::Loading);

        let release_date = read_release_date(session).await;
        if let Some(date) = &release_date {
            tracing::info!("Release date: {}", date);
        }

        let title = match read_title(session, &self.selectors).await {
            Ok(title) => title,
            Err(e) if e.is_retryable() => {
                tracing::debug!("Title lookup failed: {}", e);
                None
            }
            Err(e) => return Err(e.into()),
        };
        match &title {
            Some(title) => tracing::info!("Collecting reviews for: {}", title),
            None => tracing::warn!("Could not find movie title, continuing anyway"),
        }

        sleep(INITIAL_SETTLE).await;

        phases.advance(CrawlPhase::Harvesting);
        self.harvest(session, &mut state, &url).await?;
        state.record_growth();
        tracing::info!("Initially found {} reviews", state.len());

        let stop_reason = self
            .paginate(session, &mut state, &mut phases, &url)
            .await?;
        tracing::info!("Stopping: {}", stop_reason);

        phases.advance(CrawlPhase::Completed);
        let late = self.harvest(session, &mut state, &url).await?;
        if late > 0 {
            tracing::debug!("Final pass picked up {} reviews", late);
        }

        tracing::info!(
            "Completed crawl of {}: {} unique reviews after {} attempts",
            url,
            state.len(),
            state.attempts
        );

        let attempts = state.attempts;
        Ok(CrawlReport {
            url,
            reviews: state.into_reviews(),
            release_date,
            title,
            phase: phases.current,
            stop_reason: Some(stop_reason),
            attempts,
            phases: phases.history,
        })
    }

    /// Runs load-more cycles until one of the stop conditions holds
    async fn paginate<S: PageSession>(
        &self,
        session: &mut S,
        state: &mut CrawlState,
        phases: &mut PhaseTrail,
        url: &str,
    ) -> SessionResult<StopReason> {
        let max_failures = self.config.max_consecutive_failures;

        loop {
            if self.config.review_ceiling_reached(state.len()) {
                tracing::info!("Reached maximum number of reviews ({})", state.len());
                return Ok(StopReason::ReviewCeiling);
            }
            if state.attempts >= self.config.max_attempts {
                tracing::info!("Reached maximum of {} load-more attempts", state.attempts);
                return Ok(StopReason::AttemptCeiling);
            }

            tolerate(session.scroll_to(ScrollPosition::Bottom).await, "scroll")?;
            sleep(self.config.scroll_pause()).await;

            let control = match self.find_control(session).await? {
                Some(control) => control,
                None => {
                    tracing::info!("No 'Load More' control left, assuming the list is complete");
                    return Ok(StopReason::ControlAbsent);
                }
            };

            state.attempts += 1;
            phases.advance(CrawlPhase::Paginating);
            tracing::info!(
                "Clicking 'Load More' (attempt {}/{})",
                state.attempts,
                self.config.max_attempts
            );

            match activate(session, &control).await {
                Ok(()) => {
                    sleep(SPINNER_WAIT).await;
                    sleep(RENDER_WAIT).await;

                    phases.advance(CrawlPhase::Harvesting);
                    let before = state.len();
                    self.harvest(session, state, url).await?;

                    if state.len() > before {
                        tracing::info!(
                            "Added {} new reviews. Total: {}",
                            state.len() - before,
                            state.len()
                        );
                        state.record_growth();
                    } else {
                        let streak = state.record_failure();
                        tracing::info!(
                            "No new reviews after clicking 'Load More' (failures {}/{})",
                            streak,
                            max_failures
                        );
                        if streak >= max_failures {
                            tracing::info!("Stopping after {} cycles without new reviews", streak);
                            return Ok(StopReason::ConsecutiveFailures);
                        }
                    }

                    if self.config.review_ceiling_reached(state.len()) {
                        tracing::info!("Reached maximum number of reviews ({})", state.len());
                        return Ok(StopReason::ReviewCeiling);
                    }

                    let delay = random_delay(self.config.min_delay, self.config.max_delay);
                    tracing::info!("Waiting {:.2}s before next click", delay.as_secs_f64());
                    sleep(delay).await;
                }
                Err(e) if e.is_retryable() => {
                    let streak = state.record_failure();
                    tracing::warn!(
                        "Error clicking 'Load More' (failures {}/{}): {}",
                        streak,
                        max_failures,
                        e
                    );
                    if streak >= max_failures {
                        tracing::info!("Stopping after {} failed clicks", streak);
                        return Ok(StopReason::ConsecutiveFailures);
                    }
                    self.recover(session).await?;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Searches for the control, then once more after an extra scroll
    async fn find_control<S: PageSession>(
        &self,
        session: &mut S,
    ) -> SessionResult<Option<S::Element>> {
        let locators = &self.selectors.load_more;

        if let Some(control) = locate_control(session, locators, self.config.control_wait()).await? {
            return Ok(Some(control));
        }

        tracing::info!("No 'Load More' control found, trying one more scroll");
        tolerate(session.scroll_to(ScrollPosition::Bottom).await, "scroll")?;
        sleep(self.config.scroll_pause() * 2).await;

        locate_control(session, locators, self.config.control_retry_wait()).await
    }

    /// Scrolls to the top and back down to unstick the page
    async fn recover<S: PageSession>(&self, session: &mut S) -> SessionResult<()> {
        tolerate(session.scroll_to(ScrollPosition::Top).await, "scroll reset")?;
        sleep(RECOVERY_TOP_PAUSE).await;
        tolerate(session.scroll_to(ScrollPosition::Bottom).await, "scroll reset")?;
        sleep(RECOVERY_BOTTOM_PAUSE).await;
        Ok(())
    }

    async fn harvest<S: PageSession>(
        &self,
        session: &mut S,
        state: &mut CrawlState,
        url: &str,
    ) -> SessionResult<usize> {
        harvest(
            session,
            state,
            url,
            &self.selectors,
            self.config.harvest_retries,
        )
        .await
    }
}

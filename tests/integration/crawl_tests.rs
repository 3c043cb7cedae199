//! Integration tests for the crawl engine
//!
//! These tests drive the full crawl cycle against a scripted in-memory page.
//! Time is paused, so the bounded waits and courtesy delays finish instantly.

mod support;

use review_harvest::config::{CrawlConfig, SelectorConfig};
use review_harvest::crawler::harvest;
use review_harvest::review::ReviewRecord;
use review_harvest::session::PageSession;
use review_harvest::{CrawlPhase, CrawlReport, CrawlState, Crawler, ScrapeError, SessionError, StopReason};
use support::{rows, ControlMode, FakeRow, PageScript, ScriptedSession};

const MOVIE: &str = "https://www.rottentomatoes.com/m/heat_1995";
const REVIEWS: &str = "https://www.rottentomatoes.com/m/heat_1995/reviews";

/// Creates a crawler with default selectors and the given loop policy
fn create_test_crawler(config: CrawlConfig) -> Crawler {
    Crawler::new(config, SelectorConfig::default())
}

async fn crawl(script: PageScript, config: CrawlConfig) -> (CrawlReport, support::Probe) {
    let (session, probe) = ScriptedSession::new(script);
    let report = create_test_crawler(config)
        .run(session, MOVIE)
        .await
        .expect("Crawl failed");

    let probe = std::mem::take(&mut *probe.lock().unwrap());
    (report, probe)
}

#[tokio::test(start_paused = true)]
async fn test_two_rows_without_control_completes_immediately() {
    let script = PageScript {
        initial: rows(0..2),
        control: ControlMode::Absent,
        ..PageScript::default()
    };

    let (report, probe) = crawl(script, CrawlConfig::default()).await;

    assert_eq!(report.len(), 2);
    assert_eq!(report.attempts, 0);
    assert_eq!(report.phase, CrawlPhase::Completed);
    assert_eq!(report.stop_reason, Some(StopReason::ControlAbsent));
    assert_eq!(
        report.phases,
        vec![
            CrawlPhase::Initializing,
            CrawlPhase::Loading,
            CrawlPhase::Harvesting,
            CrawlPhase::Completed,
        ]
    );
    assert_eq!(probe.clicks, 0);
    assert!(probe.closed, "Session should be closed");
}

#[tokio::test(start_paused = true)]
async fn test_url_is_normalized_before_navigation() {
    let script = PageScript {
        initial: rows(0..1),
        ..PageScript::default()
    };
    let (session, probe) = ScriptedSession::new(script);

    let report = create_test_crawler(CrawlConfig::default())
        .run(session, "https://www.rottentomatoes.com/m/heat_1995/")
        .await
        .expect("Crawl failed");

    assert_eq!(report.url, REVIEWS);
    assert_eq!(probe.lock().unwrap().navigations, vec![REVIEWS.to_string()]);
    assert!(report.reviews.iter().all(|r| r.movie_url == REVIEWS));
}

#[tokio::test(start_paused = true)]
async fn test_collects_every_batch_until_control_disappears() {
    let script = PageScript {
        initial: rows(0..3),
        batches: vec![rows(3..6), rows(6..8)].into(),
        control: ControlMode::UntilExhausted,
        ..PageScript::default()
    };

    let (report, probe) = crawl(script, CrawlConfig::default()).await;

    assert_eq!(report.len(), 8);
    assert_eq!(report.attempts, 2);
    assert_eq!(probe.clicks, 2);
    assert_eq!(report.stop_reason, Some(StopReason::ControlAbsent));

    // First-seen order is preserved
    let critics: Vec<_> = report.reviews.iter().map(|r| r.critic.as_str()).collect();
    assert_eq!(critics[0], "Critic 0");
    assert_eq!(critics[7], "Critic 7");
}

#[tokio::test(start_paused = true)]
async fn test_attempt_ceiling_bounds_endless_page() {
    let script = PageScript {
        initial: rows(0..2),
        control: ControlMode::Always,
        endless: true,
        rows_per_click: 2,
        ..PageScript::default()
    };
    let config = CrawlConfig {
        max_attempts: 5,
        ..CrawlConfig::default()
    };

    let (report, probe) = crawl(script, config).await;

    assert_eq!(report.attempts, 5);
    assert_eq!(probe.clicks, 5);
    assert_eq!(report.stop_reason, Some(StopReason::AttemptCeiling));
    assert_eq!(report.phase, CrawlPhase::Completed);
    assert_eq!(report.len(), 2 + 5 * 2);
}

#[tokio::test(start_paused = true)]
async fn test_stops_after_exactly_three_cycles_without_growth() {
    let script = PageScript {
        initial: rows(0..4),
        control: ControlMode::Always,
        ..PageScript::default()
    };

    let (report, probe) = crawl(script, CrawlConfig::default()).await;

    assert_eq!(report.attempts, 3);
    assert_eq!(probe.clicks, 3);
    assert_eq!(report.stop_reason, Some(StopReason::ConsecutiveFailures));
    assert_eq!(report.len(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_growth_resets_the_failure_streak() {
    // Two empty clicks, one productive click, then two more empty clicks
    let script = PageScript {
        initial: rows(0..2),
        batches: vec![vec![], vec![], rows(2..4), vec![], vec![]].into(),
        control: ControlMode::Always,
        ..PageScript::default()
    };

    let (report, _) = crawl(script, CrawlConfig::default()).await;

    // The streak restarts after the third click, so three more empty clicks end it
    assert_eq!(report.attempts, 6);
    assert_eq!(report.len(), 4);
    assert_eq!(report.stop_reason, Some(StopReason::ConsecutiveFailures));
}

#[tokio::test(start_paused = true)]
async fn test_review_ceiling_stops_at_or_just_above_limit() {
    let script = PageScript {
        initial: rows(0..2),
        control: ControlMode::Always,
        endless: true,
        rows_per_click: 2,
        ..PageScript::default()
    };
    let config = CrawlConfig {
        max_reviews: Some(5),
        ..CrawlConfig::default()
    };

    let (report, _) = crawl(script, config).await;

    assert_eq!(report.stop_reason, Some(StopReason::ReviewCeiling));
    assert_eq!(report.attempts, 2);
    assert!(report.len() >= 5);
    assert!(report.len() < 5 + 2, "Overshoot is at most one batch");
}

#[tokio::test(start_paused = true)]
async fn test_review_ceiling_met_by_first_page() {
    let script = PageScript {
        initial: rows(0..10),
        control: ControlMode::Always,
        endless: true,
        ..PageScript::default()
    };
    let config = CrawlConfig {
        max_reviews: Some(3),
        ..CrawlConfig::default()
    };

    let (report, probe) = crawl(script, config).await;

    assert_eq!(report.attempts, 0);
    assert_eq!(probe.clicks, 0);
    assert_eq!(report.len(), 10);
    assert_eq!(report.stop_reason, Some(StopReason::ReviewCeiling));
}

#[tokio::test(start_paused = true)]
async fn test_identity_collisions_collapse() {
    let shared = "A tense, sprawling crime epic that earns every one of its minutes";
    let first = FakeRow {
        text: Some(format!("{} and then some.", shared)),
        ..FakeRow::numbered(1)
    };
    let second = FakeRow {
        text: Some(format!("{} but drags at the end.", shared)),
        ..FakeRow::numbered(1)
    };
    let different_start = FakeRow {
        text: Some("Completely different opening words here.".to_string()),
        ..FakeRow::numbered(1)
    };

    let script = PageScript {
        initial: vec![first, second, different_start],
        ..PageScript::default()
    };

    let (report, _) = crawl(script, CrawlConfig::default()).await;

    assert_eq!(report.len(), 2);
    assert!(report.reviews[0].text.ends_with("and then some."));
}

#[tokio::test(start_paused = true)]
async fn test_harvesting_unchanged_page_twice_is_idempotent() {
    let script = PageScript {
        initial: rows(0..5),
        ..PageScript::default()
    };
    let (mut session, _) = ScriptedSession::new(script);
    let selectors = SelectorConfig::default();
    let mut state = CrawlState::new();

    session.navigate(REVIEWS).await.expect("Navigation failed");

    let first = harvest(&mut session, &mut state, REVIEWS, &selectors, 3)
        .await
        .expect("First harvest failed");
    let second = harvest(&mut session, &mut state, REVIEWS, &selectors, 3)
        .await
        .expect("Second harvest failed");

    assert_eq!(first, 5);
    assert_eq!(second, 0);
    assert_eq!(state.len(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_harvest_of_empty_page_gives_up_quietly() {
    let (mut session, _) = ScriptedSession::new(PageScript::default());
    let mut state = CrawlState::new();

    let added = harvest(
        &mut session,
        &mut state,
        REVIEWS,
        &SelectorConfig::default(),
        3,
    )
    .await
    .expect("Empty scans are not an error");

    assert_eq!(added, 0);
    assert!(state.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_empty_harvest_makes_configured_number_of_scans() {
    for scans in [CrawlConfig::default().harvest_retries, 5] {
        let (mut session, probe) = ScriptedSession::new(PageScript::default());
        let mut state = CrawlState::new();

        harvest(
            &mut session,
            &mut state,
            REVIEWS,
            &SelectorConfig::default(),
            scans,
        )
        .await
        .expect("Empty scans are not an error");

        assert_eq!(probe.lock().unwrap().row_scans, scans);
    }
}

#[tokio::test(start_paused = true)]
async fn test_stale_row_triggers_rescan() {
    let script = PageScript {
        initial: vec![FakeRow::numbered(0), FakeRow::numbered(1).stale_for(1)],
        ..PageScript::default()
    };

    let (report, _) = crawl(script, CrawlConfig::default()).await;

    assert_eq!(report.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_missing_fields_fall_back_to_defaults() {
    let script = PageScript {
        initial: vec![FakeRow::default()],
        ..PageScript::default()
    };

    let (report, _) = crawl(script, CrawlConfig::default()).await;

    assert_eq!(report.reviews, vec![ReviewRecord::placeholder(REVIEWS)]);
    assert_eq!(report.reviews[0].sentiment.as_str(), "unknown");
    assert_eq!(report.reviews[0].text, "No text available");
}

#[tokio::test(start_paused = true)]
async fn test_extracted_fields() {
    let script = PageScript {
        initial: vec![FakeRow::numbered(4)],
        ..PageScript::default()
    };

    let (report, _) = crawl(script, CrawlConfig::default()).await;
    let review = &report.reviews[0];

    assert_eq!(review.critic, "Critic 4");
    assert_eq!(review.publication, "Publication 4");
    assert_eq!(review.sentiment.as_str(), "positive");
    assert_eq!(review.original_score, "5/5");
    assert_eq!(review.date, "Jan 1, 2024");
    assert_eq!(review.url, "https://example.com/review/4");
}

#[tokio::test(start_paused = true)]
async fn test_page_metadata_is_reported() {
    let script = PageScript {
        initial: rows(0..1),
        title: Some("Heat".to_string()),
        release_label: Some("In Theaters: Dec 15, 1995".to_string()),
        ..PageScript::default()
    };

    let (report, _) = crawl(script, CrawlConfig::default()).await;

    assert_eq!(report.title.as_deref(), Some("Heat"));
    assert_eq!(report.release_date.as_deref(), Some("1995-12-15"));
}

#[tokio::test(start_paused = true)]
async fn test_load_timeout_fails_with_empty_result() {
    let script = PageScript {
        initial: rows(0..3),
        never_renders: true,
        release_label: Some("In Theaters: Dec 15, 1995".to_string()),
        ..PageScript::default()
    };

    let (report, probe) = crawl(script, CrawlConfig::default()).await;

    assert!(report.is_failed());
    assert!(report.is_empty());
    assert_eq!(report.release_date, None);
    assert_eq!(report.stop_reason, Some(StopReason::LoadTimeout));
    assert_eq!(
        report.phases,
        vec![CrawlPhase::Initializing, CrawlPhase::Failed]
    );
    assert!(probe.closed, "Session should be closed after a timeout");
}

#[tokio::test(start_paused = true)]
async fn test_intercepted_click_is_retried() {
    let script = PageScript {
        initial: rows(0..2),
        batches: vec![rows(2..4)].into(),
        control: ControlMode::UntilExhausted,
        failing_clicks: 1,
        ..PageScript::default()
    };

    let (report, probe) = crawl(script, CrawlConfig::default()).await;

    assert_eq!(probe.failed_clicks, 1);
    assert_eq!(probe.clicks, 1);
    assert_eq!(report.attempts, 2);
    assert_eq!(report.len(), 4);
    assert_eq!(report.stop_reason, Some(StopReason::ControlAbsent));
}

#[tokio::test(start_paused = true)]
async fn test_repeated_click_failures_end_the_crawl() {
    let script = PageScript {
        initial: rows(0..2),
        control: ControlMode::Always,
        endless: true,
        failing_clicks: 10,
        ..PageScript::default()
    };

    let (report, probe) = crawl(script, CrawlConfig::default()).await;

    assert_eq!(probe.failed_clicks, 3);
    assert_eq!(probe.clicks, 0);
    assert_eq!(report.stop_reason, Some(StopReason::ConsecutiveFailures));
    assert_eq!(report.len(), 2);
    assert_eq!(report.phase, CrawlPhase::Completed);
}

#[tokio::test(start_paused = true)]
async fn test_session_closed_when_crawl_errors() {
    let script = PageScript {
        navigation_error: Some(SessionError::Disconnected("browser exited".to_string())),
        ..PageScript::default()
    };
    let (session, probe) = ScriptedSession::new(script);

    let result = create_test_crawler(CrawlConfig::default())
        .run(session, MOVIE)
        .await;

    assert!(matches!(
        result,
        Err(ScrapeError::Session(SessionError::Disconnected(_)))
    ));
    assert!(probe.lock().unwrap().closed, "Session should be closed after an error");
}

#[tokio::test(start_paused = true)]
async fn test_later_locators_find_the_control() {
    for locator in 1..SelectorConfig::default().load_more.len() {
        let script = PageScript {
            initial: rows(0..2),
            batches: vec![rows(2..4)].into(),
            control: ControlMode::UntilExhausted,
            control_locator: locator,
            ..PageScript::default()
        };

        let (report, probe) = crawl(script, CrawlConfig::default()).await;

        assert_eq!(probe.clicks, 1, "locator {} should be used", locator);
        assert_eq!(report.len(), 4);
        assert_eq!(report.stop_reason, Some(StopReason::ControlAbsent));
    }
}

#[tokio::test(start_paused = true)]
async fn test_text_filtered_locator_skips_other_buttons() {
    let script = PageScript {
        initial: rows(0..2),
        batches: vec![rows(2..5)].into(),
        control: ControlMode::UntilExhausted,
        control_locator: 2,
        control_label: "Load More Reviews".to_string(),
        decoys: vec!["Sign In".to_string(), "Watchlist".to_string()],
        ..PageScript::default()
    };

    let (report, probe) = crawl(script, CrawlConfig::default()).await;

    assert_eq!(probe.clicks, 1);
    assert_eq!(report.len(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_buttons_without_matching_text_are_not_the_control() {
    let script = PageScript {
        initial: rows(0..2),
        control: ControlMode::Absent,
        control_locator: 2,
        decoys: vec!["Sign In".to_string()],
        ..PageScript::default()
    };

    let (report, probe) = crawl(script, CrawlConfig::default()).await;

    assert_eq!(probe.clicks, 0);
    assert_eq!(report.attempts, 0);
    assert_eq!(report.stop_reason, Some(StopReason::ControlAbsent));
}

#[tokio::test(start_paused = true)]
async fn test_control_found_after_extra_scroll() {
    let script = PageScript {
        initial: rows(0..2),
        batches: vec![rows(2..4)].into(),
        control: ControlMode::AfterSecondScroll,
        ..PageScript::default()
    };

    let (report, probe) = crawl(script, CrawlConfig::default()).await;

    assert_eq!(probe.clicks, 1);
    assert_eq!(report.attempts, 1);
    assert_eq!(report.len(), 4);
    assert!(report.phases.contains(&CrawlPhase::Paginating));
}

use crate::config::SelectorConfig;
use crate::crawler::extractor::extract_review;
use crate::session::PageSession;
use crate::state::CrawlState;
use crate::SessionResult;
use std::time::Duration;
use tokio::time::sleep;

/// Pause between two scans of the review list
pub const RESCAN_PAUSE: Duration = Duration::from_secs(1);

/// Scans every rendered review row and absorbs the unseen ones into `state`
///
/// Empty scans and stale rows trigger a full rescan, up to `scans` passes in
/// total. Running out of passes is not an error. A row that fails to extract
/// for any other retryable reason is logged and skipped.
///
/// Returns the number of reviews added.
pub async fn harvest<S: PageSession>(
    session: &mut S,
    state: &mut CrawlState,
    movie_url: &str,
    selectors: &SelectorConfig,
    scans: u32,
) -> SessionResult<usize> {
    let mut added = 0;

    for scan in 1..=scans {
        let rows = match session.find_all(&selectors.review_row).await {
            Ok(rows) => rows,
            Err(e) if e.is_retryable() => {
                tracing::debug!("Review scan {}/{} failed: {}", scan, scans, e);
                pause_before_rescan(scan, scans).await;
                continue;
            }
            Err(e) => return Err(e),
        };

        if rows.is_empty() {
            tracing::debug!("No review rows rendered (scan {}/{})", scan, scans);
            pause_before_rescan(scan, scans).await;
            continue;
        }

        let mut stale = false;
        for (index, row) in rows.iter().enumerate() {
            match extract_review(row, index, movie_url, selectors).await {
                Ok(record) => {
                    if state.absorb(record) {
                        added += 1;
                    }
                }
                Err(e) if e.source.is_stale() => {
                    tracing::debug!("Row {} went stale, rescanning (scan {}/{})", index, scan, scans);
                    stale = true;
                    break;
                }
                Err(e) if !e.source.is_retryable() => return Err(e.source),
                Err(e) => tracing::warn!("Skipping review: {}", e),
            }
        }

        if !stale {
            tracing::debug!(
                "Scanned {} rows, {} new, {} total",
                rows.len(),
                added,
                state.len()
            );
            return Ok(added);
        }

        pause_before_rescan(scan, scans).await;
    }

    Ok(added)
}

async fn pause_before_rescan(scan: u32, scans: u32) {
    if scan < scans {
        sleep(RESCAN_PAUSE).await;
    }
}

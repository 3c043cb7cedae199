//! Page-level metadata read once per crawl

use crate::config::SelectorConfig;
use crate::session::{ElementHandle, PageSession};
use crate::{SessionError, SessionResult};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

const THEATER_MARKER: &str = "In Theaters:";

/// Lists every list item whose text mentions the theatrical release
///
/// Each entry carries the item's own text nodes (`own`) and its full
/// rendered text (`full`), in document order.
pub const RELEASE_DATE_JS: &str = r#"(() => {
    const found = [];
    for (const item of document.querySelectorAll('li')) {
        if (!item.textContent.includes('In Theaters:')) continue;
        const own = Array.from(item.childNodes)
            .filter((node) => node.nodeType === Node.TEXT_NODE)
            .map((node) => node.textContent)
            .join('');
        found.push({ own, full: item.innerText || item.textContent });
    }
    return found;
})()"#;

#[derive(Debug, Deserialize)]
struct LabelCandidate {
    own: String,
    full: String,
}

/// Picks the release label out of a [`RELEASE_DATE_JS`] result
///
/// The item holding the marker in its own text wins. Otherwise the innermost
/// match is used, which is the last one in document order since wrapping
/// items precede what they wrap.
pub fn release_label(value: &Value) -> Option<String> {
    let candidates: Vec<LabelCandidate> = serde_json::from_value(value.clone()).ok()?;

    candidates
        .iter()
        .find(|candidate| candidate.own.contains(THEATER_MARKER))
        .or_else(|| candidates.last())
        .map(|candidate| candidate.full.clone())
}

/// Normalizes a release date label to YYYY-MM-DD
///
/// Labels that are not in "Mon D, YYYY" form are kept, with spaces turned
/// into underscores and commas dropped. Returns `None` for an empty label.
pub fn parse_release_date(label: &str) -> Option<String> {
    let text = label.replace(THEATER_MARKER, "");
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    match NaiveDate::parse_from_str(text, "%b %d, %Y") {
        Ok(date) => Some(date.format("%Y-%m-%d").to_string()),
        Err(_) => Some(text.replace(' ', "_").replace(',', "")),
    }
}

/// Reads the release date from the page, if one is shown
pub async fn read_release_date<S: PageSession>(session: &mut S) -> Option<String> {
    match session.execute_script(RELEASE_DATE_JS).await {
        Ok(value) => release_label(&value).and_then(|label| parse_release_date(&label)),
        Err(e) => {
            tracing::warn!("Could not extract release date: {}", e);
            None
        }
    }
}

/// Reads the movie title shown next to the review list
pub async fn read_title<S: PageSession>(
    session: &mut S,
    selectors: &SelectorConfig,
) -> SessionResult<Option<String>> {
    let heading = match session.find_one(&selectors.page_title).await {
        Ok(heading) => heading,
        Err(SessionError::NotFound { .. }) => return Ok(None),
        Err(e) => return Err(e),
    };

    let title = heading.text().await?;
    let title = title.trim();
    Ok((!title.is_empty()).then(|| title.to_string()))
}

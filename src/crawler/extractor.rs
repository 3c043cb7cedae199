//! Review row extraction
//!
//! Every sub-field lookup yields a [`Field`]: either the value read from the
//! page or the documented default. Only failures other than "not found"
//! abort a row.

use crate::config::SelectorConfig;
use crate::review::{
    ReviewRecord, Sentiment, DEFAULT_CRITIC, DEFAULT_DATE, DEFAULT_PUBLICATION, DEFAULT_TEXT,
};
use crate::session::ElementHandle;
use crate::{ExtractionError, SessionError, SessionResult};

/// Marker preceding the publication's own grade
const ORIGINAL_SCORE_MARKER: &str = "Original Score:";

/// Outcome of one sub-field lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Found(String),
    Defaulted(String),
}

impl Field {
    pub fn is_defaulted(&self) -> bool {
        matches!(self, Self::Defaulted(_))
    }

    pub fn into_value(self) -> String {
        match self {
            Self::Found(value) | Self::Defaulted(value) => value,
        }
    }
}

/// Turns a lookup result into a field, defaulting on a missing element
fn or_default(lookup: SessionResult<String>, default: &str) -> SessionResult<Field> {
    match lookup {
        Ok(value) => Ok(Field::Found(value)),
        Err(SessionError::NotFound { .. }) => Ok(Field::Defaulted(default.to_string())),
        Err(e) => Err(e),
    }
}

async fn child_text<E: ElementHandle>(row: &E, selector: &str) -> SessionResult<String> {
    let child = row.find_child(selector).await?;
    Ok(child.text().await?.trim().to_string())
}

async fn child_attribute<E: ElementHandle>(
    row: &E,
    selector: &str,
    attribute: &str,
) -> SessionResult<String> {
    let child = row.find_child(selector).await?;
    child
        .attribute(attribute)
        .await?
        .ok_or_else(|| SessionError::NotFound {
            selector: format!("{}[{}]", selector, attribute),
        })
}

/// Extracts the grade following "Original Score:" up to the next "|"
///
/// Returns an empty string when the marker is absent.
pub fn parse_original_score(text: &str) -> String {
    match text.split_once(ORIGINAL_SCORE_MARKER) {
        Some((_, rest)) => rest.split('|').next().unwrap_or_default().trim().to_string(),
        None => String::new(),
    }
}

/// Builds a complete review record from one rendered row
///
/// Missing sub-elements fall back to defaults. Any other session failure is
/// reported as an [`ExtractionError`] carrying the row index.
pub async fn extract_review<E: ElementHandle>(
    row: &E,
    index: usize,
    movie_url: &str,
    selectors: &SelectorConfig,
) -> Result<ReviewRecord, ExtractionError> {
    read_fields(row, movie_url, selectors)
        .await
        .map_err(|source| ExtractionError { index, source })
}

async fn read_fields<E: ElementHandle>(
    row: &E,
    movie_url: &str,
    selectors: &SelectorConfig,
) -> SessionResult<ReviewRecord> {
    let critic = or_default(child_text(row, &selectors.critic).await, DEFAULT_CRITIC)?;
    let publication = or_default(
        child_text(row, &selectors.publication).await,
        DEFAULT_PUBLICATION,
    )?;
    let text = or_default(child_text(row, &selectors.review_text).await, DEFAULT_TEXT)?;
    let sentiment = or_default(
        child_attribute(row, &selectors.score_icon, &selectors.score_attribute).await,
        Sentiment::Unknown.as_str(),
    )?;
    let date = or_default(child_text(row, &selectors.review_date).await, DEFAULT_DATE)?;
    let url = or_default(
        child_attribute(row, &selectors.review_link, "href").await,
        "",
    )?;
    let original_score = match or_default(child_text(row, &selectors.original_score).await, "")? {
        Field::Found(raw) => parse_original_score(&raw),
        Field::Defaulted(empty) => empty,
    };

    if critic.is_defaulted() || text.is_defaulted() {
        tracing::trace!(
            "Row defaulted fields (critic: {}, text: {})",
            critic.is_defaulted(),
            text.is_defaulted()
        );
    }

    Ok(ReviewRecord {
        critic: critic.into_value(),
        publication: publication.into_value(),
        text: text.into_value(),
        sentiment: Sentiment::from_attribute(&sentiment.into_value()),
        original_score,
        date: date.into_value(),
        url: url.into_value(),
        movie_url: movie_url.to_string(),
    })
}

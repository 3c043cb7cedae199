use crate::url::title_from_url;
use std::fmt;

/// Title used when nothing better is known
pub const DEFAULT_TITLE: &str = "reviews";

/// Where a resolved title came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleSource {
    /// Supplied by the caller
    Explicit,
    /// Read from the page during the crawl
    Page,
    /// Guessed from the movie slug in the URL
    Url,
    Default,
}

impl fmt::Display for TitleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Explicit => "provided",
            Self::Page => "page",
            Self::Url => "URL",
            Self::Default => "default",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTitle {
    pub title: String,
    pub source: TitleSource,
}

impl ResolvedTitle {
    pub fn is_default(&self) -> bool {
        self.source == TitleSource::Default
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Picks the best available title
///
/// Order: explicit argument, title observed on the page, guess from the
/// movie URL, then [`DEFAULT_TITLE`]. Blank candidates are skipped.
pub fn resolve_title(explicit: Option<&str>, observed: Option<&str>, movie_url: &str) -> ResolvedTitle {
    let (title, source) = if let Some(title) = non_blank(explicit) {
        (title.to_string(), TitleSource::Explicit)
    } else if let Some(title) = non_blank(observed) {
        (title.to_string(), TitleSource::Page)
    } else if let Some(title) = title_from_url(movie_url) {
        (title, TitleSource::Url)
    } else {
        (DEFAULT_TITLE.to_string(), TitleSource::Default)
    };

    ResolvedTitle { title, source }
}

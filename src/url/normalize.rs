use crate::UrlError;
use url::Url;

/// Path segment that marks a review-listing page
const REVIEWS_SEGMENT: &str = "reviews";

/// Makes sure a movie URL points at its review listing
///
/// Appends a `/reviews` path segment when it is missing. Trailing slashes are
/// dropped first, so both `.../m/title` and `.../m/title/` become
/// `.../m/title/reviews`, and a URL that already ends in `/reviews` (with or
/// without a trailing slash) comes back without the slash.
///
/// # Examples
///
/// ```
/// use review_harvest::url::ensure_reviews_suffix;
///
/// assert_eq!(
///     ensure_reviews_suffix("https://example.com/m/title/"),
///     "https://example.com/m/title/reviews"
/// );
/// ```
pub fn ensure_reviews_suffix(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');

    if trimmed.ends_with(&format!("/{}", REVIEWS_SEGMENT)) {
        return trimmed.to_string();
    }

    format!("{}/{}", trimmed, REVIEWS_SEGMENT)
}

/// Parses and normalizes a review URL before a browser is launched for it
///
/// # Normalization Steps
///
/// 1. Append the `/reviews` segment if absent
/// 2. Parse the URL; reject if malformed
/// 3. Require an HTTP(S) scheme and a host
///
/// # Arguments
///
/// * `url_str` - The URL string given by the user
///
/// # Returns
///
/// * `Ok(Url)` - Normalized review-listing URL
/// * `Err(UrlError)` - Failed to parse or validate the URL
pub fn parse_review_url(url_str: &str) -> Result<Url, UrlError> {
    let normalized = ensure_reviews_suffix(url_str);
    let url = Url::parse(&normalized).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }

    Ok(url)
}

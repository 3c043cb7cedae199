use chrono::NaiveDateTime;
use regex::Regex;
use std::sync::LazyLock;

/// Longest cleaned filename, extension included
pub const MAX_FILENAME_LEN: usize = 100;

/// Stem used when cleaning leaves nothing behind
pub const UNNAMED_FILE: &str = "unnamed_file";

/// Timestamp suffix of every output file
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

static FORBIDDEN_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[\\/:*?"<>|]"#).expect("hardcoded regex pattern is valid"));

static CONTROL_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\x00-\x1f\x7f]").expect("hardcoded regex pattern is valid"));

static WHITESPACE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("hardcoded regex pattern is valid"));

static UNDERSCORE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_+").expect("hardcoded regex pattern is valid"));

/// Makes a string safe to use as a filename on Windows, macOS and Linux
///
/// Forbidden characters become `_`, control characters are dropped, leading
/// and trailing spaces and dots are trimmed and whitespace runs become a
/// single `_`. Long names are cut to [`MAX_FILENAME_LEN`] characters while
/// keeping any extension.
pub fn clean_filename(name: &str) -> String {
    let cleaned = FORBIDDEN_CHARS.replace_all(name, "_");
    let cleaned = CONTROL_CHARS.replace_all(&cleaned, "");
    let cleaned = cleaned.trim_matches(|c| c == ' ' || c == '.');
    let cleaned = WHITESPACE_RUNS.replace_all(cleaned, "_");
    let cleaned = UNDERSCORE_RUNS.replace_all(&cleaned, "_").into_owned();

    let cleaned = truncate_keeping_extension(cleaned, MAX_FILENAME_LEN);

    if cleaned.is_empty() {
        UNNAMED_FILE.to_string()
    } else {
        cleaned
    }
}

/// Longest suffix after the last dot that still counts as an extension
const MAX_EXTENSION_LEN: usize = 5;

fn truncate_keeping_extension(name: String, max: usize) -> String {
    if name.chars().count() <= max {
        return name;
    }

    let (stem, extension) = match split_extension(&name) {
        Some((stem, extension)) if extension.chars().count() < max => (stem, extension),
        _ => (name.as_str(), ""),
    };

    let keep = max - extension.chars().count();
    stem.chars().take(keep).chain(extension.chars()).collect()
}

/// Splits off a short alphanumeric `.ext` suffix, dot included
fn split_extension(name: &str) -> Option<(&str, &str)> {
    let dot = name.rfind('.').filter(|&dot| dot > 0)?;
    let suffix = &name[dot + 1..];
    let plausible = !suffix.is_empty()
        && suffix.chars().count() <= MAX_EXTENSION_LEN
        && suffix.chars().all(|c| c.is_ascii_alphanumeric());
    plausible.then(|| name.split_at(dot))
}

/// Builds `<title>[_<release date>]_<timestamp>.csv`
///
/// A `None` title yields the generic `reviews` stem.
pub fn review_filename(
    title: Option<&str>,
    release_date: Option<&str>,
    timestamp: NaiveDateTime,
) -> String {
    let stem = match title {
        Some(title) => clean_filename(title),
        None => super::title::DEFAULT_TITLE.to_string(),
    };
    let stamp = timestamp.format(TIMESTAMP_FORMAT);

    match release_date {
        Some(date) => format!("{}_{}_{}.csv", stem, date, stamp),
        None => format!("{}_{}.csv", stem, stamp),
    }
}

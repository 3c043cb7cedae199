use url::Url;

/// Guesses a movie title from a `/m/<slug>` URL
///
/// The slug's underscores become spaces and each word is title-cased, so
/// `https://example.com/m/beauty_and_the_beast_2017/reviews` yields
/// `Beauty And The Beast 2017`. Returns `None` when the URL has no `/m/` slug.
pub fn title_from_url(url_str: &str) -> Option<String> {
    let url = Url::parse(url_str.trim()).ok()?;
    let mut segments = url.path_segments()?;

    segments.find(|segment| *segment == "m")?;
    let slug = segments.next().filter(|s| !s.is_empty())?;

    let title = slug
        .split('_')
        .filter(|word| !word.is_empty())
        .map(title_case_word)
        .collect::<Vec<_>>()
        .join(" ");

    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}

//! Candidate URL filtering

use url::Url;

use crate::types::MatchMode;

/// Path segments that mark obviously non-product pages.
const EXCLUDED_SEGMENTS: &[&str] = &["/login", "/cart", "/account", "/contact", "/terms"];

/// Decide whether a candidate URL survives the user's filter.
///
/// Without a pattern the mode is ignored and a built-in heuristic drops the
/// site root and common non-catalog sections. `StartsWith` retries against
/// the path component alone, since users naturally supply path fragments
/// like `/p/` rather than full URLs.
pub fn url_matches(url: &str, pattern: Option<&str>, mode: MatchMode) -> bool {
    let Some(pattern) = pattern else {
        return passes_default_filter(url);
    };
    match mode {
        MatchMode::Contains => url.contains(pattern),
        MatchMode::EndsWith => url.ends_with(pattern),
        MatchMode::StartsWith => {
            url.starts_with(pattern)
                || Url::parse(url)
                    .map(|u| u.path().starts_with(pattern))
                    .unwrap_or(false)
        }
    }
}

fn passes_default_filter(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return true;
    };
    let path = parsed.path();
    if path.is_empty() || path == "/" {
        return false;
    }
    !EXCLUDED_SEGMENTS.iter().any(|segment| path.contains(segment))
}

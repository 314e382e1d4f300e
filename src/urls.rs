//! Target normalization and href/src resolution

use url::Url;

/// Normalize a site identifier into the resolution base for a run: prefix
/// `https://` when no scheme is present and strip any trailing slash.
pub fn resolve_target(identifier: &str) -> String {
    let trimmed = identifier.trim();
    let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };
    with_scheme.trim_end_matches('/').to_string()
}

/// Host component of the resolution base, used as the result's site name.
pub fn site_host(target: &str) -> String {
    Url::parse(target)
        .ok()
        .and_then(|u| u.host_str().map(String::from))
        .unwrap_or_else(|| {
            target
                .trim_start_matches("https://")
                .trim_start_matches("http://")
                .to_string()
        })
}

/// Resolve an href or src against the page base.
///
/// Already-absolute URLs are returned byte-for-byte; normalizing them can
/// corrupt tracking parameters some shops require on product links. `data:`
/// URIs and blank inputs resolve to empty. A failed join degrades to naive
/// concatenation, which keeps hrefs that break the strict resolver but are
/// still usable paths.
pub fn resolve_url(raw: &str, base: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() || raw.starts_with("data:") {
        return String::new();
    }
    if raw.starts_with("http://") || raw.starts_with("https://") {
        return raw.to_string();
    }
    if let Some(rest) = raw.strip_prefix("//") {
        return format!("https://{rest}");
    }
    match Url::parse(base).and_then(|b| b.join(raw)) {
        Ok(joined) => joined.to_string(),
        Err(_) => format!(
            "{}/{}",
            base.trim_end_matches('/'),
            raw.trim_start_matches('/')
        ),
    }
}

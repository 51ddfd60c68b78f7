//! Shared helpers for source adapters: href normalization and ordered de-duplication.

use std::collections::HashSet;

use url::Url;

/// Returns true if `href` already carries a URL scheme (e.g. `https:`).
#[must_use]
pub fn has_scheme(href: &str) -> bool {
    Url::parse(href).is_ok()
}

/// Turns a mirror-relative href into an absolute URL under `origin`.
///
/// - An href with a scheme is returned unchanged.
/// - An href starting with `/` is appended to the origin.
/// - Anything else is joined to the origin with a single `/`.
#[must_use]
pub fn normalize_href(href: &str, origin: &str) -> String {
    if has_scheme(href) {
        return href.to_string();
    }
    let origin = origin.trim_end_matches('/');
    if href.starts_with('/') {
        format!("{origin}{href}")
    } else {
        format!("{origin}/{href}")
    }
}

/// Removes duplicate values, keeping the first occurrence of each.
#[must_use]
pub fn dedup_preserving_order<I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}

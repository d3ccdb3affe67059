//! Link collector — same-origin crawl candidates from a page's anchors.

use std::collections::HashSet;

use url::Url;

/// Resolves anchor `href`s against `page_url` and keeps same-origin links only.
///
/// - Relative, path-relative and protocol-relative references are joined onto the page URL.
/// - Fragments are dropped, so in-page anchors collapse onto the page itself, which is excluded.
/// - `javascript:`, `mailto:` and `tel:` references are skipped.
/// - Duplicates are removed; first occurrence keeps its position.
pub fn collect_same_origin_links(page_url: &Url, hrefs: &[String]) -> Vec<Url> {
    let origin = page_url.origin();
    let mut page = page_url.clone();
    page.set_fragment(None);

    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for href in hrefs {
        let href = href.trim();
        let lowered = href.to_ascii_lowercase();
        if href.is_empty()
            || lowered.starts_with("javascript:")
            || lowered.starts_with("mailto:")
            || lowered.starts_with("tel:")
        {
            continue;
        }

        let Ok(mut resolved) = page_url.join(href) else {
            continue;
        };
        resolved.set_fragment(None);

        if resolved.origin() != origin || resolved == page {
            continue;
        }
        if seen.insert(resolved.to_string()) {
            out.push(resolved);
        }
    }

    out
}

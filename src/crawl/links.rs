// src/crawl/links.rs
// =============================================================================
// Turns the raw hrefs found on a page into crawlable URLs.
//
// For each href:
// 1. Skip anchors and special protocols (#, mailto:, tel:, javascript:)
// 2. Resolve it against the page URL (relative links become absolute)
// 3. Keep only http/https
// 4. Optionally keep only links on the seed's host
// 5. Drop the #fragment so "page#a" and "page#b" count as one page
//
// Malformed hrefs are skipped silently. One bad link never fails a page.
// =============================================================================

use url::Url;

/// Resolves and filters `hrefs` found on `page`, keeping their order.
///
/// With `same_host` set, a link survives only if its host and port match
/// `seed`'s.
pub fn crawlable_links(page: &Url, seed: &Url, same_host: bool, hrefs: &[String]) -> Vec<Url> {
    hrefs
        .iter()
        .filter_map(|href| resolve_link(page, href))
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .filter(|url| !same_host || is_same_host(seed, url))
        .collect()
}

// Resolves a link (possibly relative) to an absolute URL without a fragment
fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();

    // Skip anchors and special protocols
    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("javascript:")
    {
        return None;
    }

    let mut url = base.join(href).ok()?;
    url.set_fragment(None);
    Some(url)
}

fn is_same_host(seed: &Url, candidate: &Url) -> bool {
    candidate.host_str() == seed.host_str()
        && candidate.port_or_known_default() == seed.port_or_known_default()
}

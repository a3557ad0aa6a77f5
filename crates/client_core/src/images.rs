//! Image references embedded in template content.

use pulldown_cmark::{Event, Parser, Tag};
use url::Url;

/// Image destinations of every markdown image in `content`, in document order,
/// without duplicates.
pub fn extract_image_urls(content: &str) -> Vec<String> {
    let mut urls: Vec<String> = Vec::new();
    for event in Parser::new(content) {
        if let Event::Start(Tag::Image { dest_url, .. }) = event {
            let dest = dest_url.trim();
            if !dest.is_empty() && !urls.iter().any(|u| u == dest) {
                urls.push(dest.to_string());
            }
        }
    }
    urls
}

/// Resolves an image locator against the server base url. Absolute http(s)
/// urls pass through; other schemes are rejected.
pub fn resolve_image_url(base: &Url, locator: &str) -> Option<Url> {
    let url = base.join(locator.trim()).ok()?;
    matches!(url.scheme(), "http" | "https").then_some(url)
}

#[cfg(test)]
#[path = "tests/images_tests.rs"]
mod tests;

//! Outbound link extraction
//!
//! Every `<a href>` on a page is resolved against the page's final URL. No
//! filtering happens here; the scope filter decides what gets crawled.

use crate::html::parse_document;
use scraper::Selector;
use url::Url;

/// Extracts all anchor targets as absolute URLs
///
/// # Arguments
///
/// * `html` - The HTML content; malformed markup is parsed leniently
/// * `base_url` - The final response URL, used to resolve relative links
///
/// # Example
///
/// ```
/// use site_search::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<a href=" guide.html ">Guide</a>"#;
/// let base_url = Url::parse("https://example.com/docs/").unwrap();
/// let links = extract_links(html, &base_url);
/// assert_eq!(links, vec!["https://example.com/docs/guide.html".to_string()]);
/// ```
pub fn extract_links(html: &str, base_url: &Url) -> Vec<String> {
    let document = parse_document(html);
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, base_url) {
                    links.push(absolute_url);
                }
            }
        }
    }

    links
}

/// Resolves an href against the base URL after trimming whitespace
///
/// Returns None for empty hrefs and hrefs the URL parser rejects.
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    base_url.join(href).ok().map(|url| url.to_string())
}

//! FIFO crawl frontier
//!
//! The frontier holds discovered-but-not-yet-fetched URLs in discovery order.
//! It also remembers every normalized URL it has ever accepted during the
//! run, so a link is queued at most once even after it has been popped.

use crate::url::{normalize_url, NormalizedUrl};
use std::collections::{HashSet, VecDeque};

/// Breadth-first work list keyed by normalized URL
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<String>,
    seen: HashSet<NormalizedUrl>,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a URL to the back of the queue
    ///
    /// Returns false if the URL cannot be normalized or an equivalent URL was
    /// already queued during this run.
    pub fn push(&mut self, url: &str) -> bool {
        let Ok(key) = normalize_url(url) else {
            tracing::debug!(url = %url, "Not queueing unparseable URL");
            return false;
        };

        if !self.seen.insert(key) {
            return false;
        }

        self.queue.push_back(url.to_string());
        true
    }

    /// Removes the oldest queued URL
    pub fn pop(&mut self) -> Option<String> {
        self.queue.pop_front()
    }

    /// Whether an equivalent URL has been queued during this run
    pub fn contains(&self, url: &str) -> bool {
        normalize_url(url)
            .map(|key| self.seen.contains(&key))
            .unwrap_or(false)
    }

    /// Number of URLs still waiting
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut frontier = Frontier::new();
        assert!(frontier.push("https://example.com/a"));
        assert!(frontier.push("https://example.com/b"));
        assert!(frontier.push("https://example.com/c"));

        assert_eq!(frontier.len(), 3);
        assert_eq!(frontier.pop().as_deref(), Some("https://example.com/a"));
        assert_eq!(frontier.pop().as_deref(), Some("https://example.com/b"));
        assert_eq!(frontier.pop().as_deref(), Some("https://example.com/c"));
        assert!(frontier.pop().is_none());
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_equivalent_urls_queued_once() {
        let mut frontier = Frontier::new();
        assert!(frontier.push("https://example.com/page"));
        assert!(!frontier.push("http://example.com/page"));
        assert!(!frontier.push("https://example.com/page#top"));
        assert!(frontier.push("https://example.com/page?x=1"));
        assert_eq!(frontier.len(), 2);
    }

    #[test]
    fn test_popped_urls_are_remembered() {
        let mut frontier = Frontier::new();
        frontier.push("https://example.com/once");
        frontier.pop();

        assert!(frontier.contains("https://example.com/once#again"));
        assert!(!frontier.push("https://example.com/once"));
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_unparseable_url_rejected() {
        let mut frontier = Frontier::new();
        assert!(!frontier.push("not a url"));
        assert!(!frontier.contains("not a url"));
        assert!(frontier.is_empty());
    }
}

//! Storage traits and error types
//!
//! This module defines the narrow repository interface the crawler and the
//! indexer use, and associated error types. The traversal and scoring code
//! only ever talks to a [`CrawlStore`], so it can run against SQLite or an
//! in-memory store.

use crate::storage::{CrawlRecord, IndexRecord};
use crate::UrlError;
use thiserror::Error;

/// Name of the crawl property written once the frontier is exhausted
pub const FINISHED_PROPERTY: &str = "finished";

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] UrlError),

    #[error("Page already stored: {0}")]
    DuplicatePage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for crawl and index store implementations
///
/// URLs are passed in their original form; implementations derive the
/// normalized identity key themselves so visited checks are always made on
/// the same key.
pub trait CrawlStore {
    // ===== Visited Set =====

    /// Checks whether the normalized form of `url` has been visited
    fn is_visited(&self, url: &str) -> StorageResult<bool>;

    /// Adds `url` to the visited set and commits
    fn mark_visited(&mut self, url: &str) -> StorageResult<()>;

    /// Counts entries in the visited set
    fn count_visited(&self) -> StorageResult<u64>;

    /// Lists visited URLs in the order they were marked
    fn visited_urls(&self) -> StorageResult<Vec<String>>;

    // ===== Crawl Records =====

    /// Stores an accepted page and marks it visited in one commit
    ///
    /// # Arguments
    ///
    /// * `requested_url` - The URL taken off the frontier
    /// * `final_url` - The URL the response came from (after redirects)
    /// * `body` - The raw document body
    ///
    /// The record is keyed by `final_url`. Both URLs are marked visited.
    fn store_page(&mut self, requested_url: &str, final_url: &str, body: &str)
        -> StorageResult<()>;

    /// Loads every stored page in insertion order
    fn load_pages(&self) -> StorageResult<Vec<CrawlRecord>>;

    /// Counts stored pages
    fn count_pages(&self) -> StorageResult<u64>;

    // ===== Crawl Properties =====

    /// Records a crawl property; the latest value for a name wins
    fn set_property(&mut self, name: &str, value: bool) -> StorageResult<()>;

    /// Gets the latest value of a crawl property
    fn get_property(&self, name: &str) -> StorageResult<Option<bool>>;

    /// Returns true once a crawl has run to completion on this store
    fn is_finished(&self) -> StorageResult<bool> {
        Ok(self.get_property(FINISHED_PROPERTY)?.unwrap_or(false))
    }

    // ===== Index Artifacts =====

    /// Appends a serialized index build and returns its row ID
    fn append_index(&mut self, index_urls_json: &str, index_json: &str) -> StorageResult<i64>;

    /// Gets the most recently appended index build
    fn latest_index(&self) -> StorageResult<Option<IndexRecord>>;

    /// Counts stored index builds
    fn count_indexes(&self) -> StorageResult<u64>;
}

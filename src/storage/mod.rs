//! Storage module for persisting crawl data and index builds
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - The visited set and crawled documents
//! - Crawl properties (the completion marker)
//! - Append-only history of serialized indexes

mod memory;
mod schema;
mod sqlite;
mod traits;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;
pub use traits::{CrawlStore, StorageError, StorageResult, FINISHED_PROPERTY};

use std::path::Path;

/// Opens or creates a SQLite store at `path`
pub fn open_storage(path: &Path) -> StorageResult<SqliteStorage> {
    SqliteStorage::new(path)
}

/// A fetched document as stored by the crawler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlRecord {
    /// The URL the document was fetched from, after redirects
    pub url: String,
    /// Raw HTML or plain text
    pub body: String,
}

/// One serialized index build
#[derive(Debug, Clone)]
pub struct IndexRecord {
    pub id: i64,
    pub index_urls_json: String,
    pub index_json: String,
    pub created_at: String,
}

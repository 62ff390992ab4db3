//! In-memory storage implementation
//!
//! Holds the same data as the SQLite store in plain collections. Nothing is
//! persisted; it exists so the crawl and indexing logic can run without a
//! database.

use crate::storage::traits::{CrawlStore, StorageError, StorageResult};
use crate::storage::{CrawlRecord, IndexRecord};
use crate::url::{normalize_url, NormalizedUrl};
use chrono::Utc;
use std::collections::HashSet;

/// Volatile store backed by vectors and a hash set
#[derive(Debug, Default)]
pub struct MemoryStorage {
    pages: Vec<CrawlRecord>,
    visited: Vec<String>,
    visited_keys: HashSet<NormalizedUrl>,
    properties: Vec<(String, bool)>,
    indexes: Vec<IndexRecord>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert_visited(&mut self, url: &str, key: NormalizedUrl) {
        self.visited.push(url.to_string());
        self.visited_keys.insert(key);
    }
}

impl CrawlStore for MemoryStorage {
    fn is_visited(&self, url: &str) -> StorageResult<bool> {
        Ok(self.visited_keys.contains(&normalize_url(url)?))
    }

    fn mark_visited(&mut self, url: &str) -> StorageResult<()> {
        let key = normalize_url(url)?;
        self.insert_visited(url, key);
        Ok(())
    }

    fn count_visited(&self) -> StorageResult<u64> {
        Ok(self.visited.len() as u64)
    }

    fn visited_urls(&self) -> StorageResult<Vec<String>> {
        Ok(self.visited.clone())
    }

    fn store_page(
        &mut self,
        requested_url: &str,
        final_url: &str,
        body: &str,
    ) -> StorageResult<()> {
        let requested_key = normalize_url(requested_url)?;
        let final_key = normalize_url(final_url)?;

        if self.pages.iter().any(|p| p.url == final_url) {
            return Err(StorageError::DuplicatePage(final_url.to_string()));
        }

        self.pages.push(CrawlRecord {
            url: final_url.to_string(),
            body: body.to_string(),
        });
        self.insert_visited(requested_url, requested_key);
        if final_url != requested_url {
            self.insert_visited(final_url, final_key);
        }
        Ok(())
    }

    fn load_pages(&self) -> StorageResult<Vec<CrawlRecord>> {
        Ok(self.pages.clone())
    }

    fn count_pages(&self) -> StorageResult<u64> {
        Ok(self.pages.len() as u64)
    }

    fn set_property(&mut self, name: &str, value: bool) -> StorageResult<()> {
        self.properties.push((name.to_string(), value));
        Ok(())
    }

    fn get_property(&self, name: &str) -> StorageResult<Option<bool>> {
        Ok(self
            .properties
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v))
    }

    fn append_index(&mut self, index_urls_json: &str, index_json: &str) -> StorageResult<i64> {
        let id = self.indexes.len() as i64 + 1;
        self.indexes.push(IndexRecord {
            id,
            index_urls_json: index_urls_json.to_string(),
            index_json: index_json.to_string(),
            created_at: Utc::now().to_rfc3339(),
        });
        Ok(id)
    }

    fn latest_index(&self) -> StorageResult<Option<IndexRecord>> {
        Ok(self.indexes.last().cloned())
    }

    fn count_indexes(&self) -> StorageResult<u64> {
        Ok(self.indexes.len() as u64)
    }
}

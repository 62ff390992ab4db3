//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the CrawlStore trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{CrawlStore, StorageError, StorageResult};
use crate::storage::{CrawlRecord, IndexRecord};
use crate::url::normalize_url;
use chrono::Utc;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens or creates a store at `path`
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

impl CrawlStore for SqliteStorage {
    // ===== Visited Set =====

    fn is_visited(&self, url: &str) -> StorageResult<bool> {
        let key = normalize_url(url)?.to_string();
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM visited WHERE normalized = ?1 LIMIT 1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn mark_visited(&mut self, url: &str) -> StorageResult<()> {
        let key = normalize_url(url)?.to_string();
        self.conn.execute(
            "INSERT INTO visited (url, normalized) VALUES (?1, ?2)",
            params![url, key],
        )?;
        Ok(())
    }

    fn count_visited(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM visited", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn visited_urls(&self) -> StorageResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT url FROM visited ORDER BY rowid")?;

        let urls = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(urls)
    }

    // ===== Crawl Records =====

    fn store_page(
        &mut self,
        requested_url: &str,
        final_url: &str,
        body: &str,
    ) -> StorageResult<()> {
        let requested_key = normalize_url(requested_url)?.to_string();
        let final_key = normalize_url(final_url)?.to_string();

        let tx = self.conn.transaction()?;

        match tx.execute(
            "INSERT INTO crawl_data (url, html) VALUES (?1, ?2)",
            params![final_url, body],
        ) {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                return Err(StorageError::DuplicatePage(final_url.to_string()));
            }
            Err(e) => return Err(e.into()),
        }

        tx.execute(
            "INSERT INTO visited (url, normalized) VALUES (?1, ?2)",
            params![requested_url, requested_key],
        )?;

        // A redirect gives two URLs for one document
        if final_url != requested_url {
            tx.execute(
                "INSERT INTO visited (url, normalized) VALUES (?1, ?2)",
                params![final_url, final_key],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    fn load_pages(&self) -> StorageResult<Vec<CrawlRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT url, html FROM crawl_data ORDER BY rowid")?;

        let pages = stmt
            .query_map([], |row| {
                Ok(CrawlRecord {
                    url: row.get(0)?,
                    body: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(pages)
    }

    fn count_pages(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM crawl_data", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    // ===== Crawl Properties =====

    fn set_property(&mut self, name: &str, value: bool) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO crawl_properties (name, value) VALUES (?1, ?2)",
            params![name, value],
        )?;
        Ok(())
    }

    fn get_property(&self, name: &str) -> StorageResult<Option<bool>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM crawl_properties WHERE name = ?1 ORDER BY rowid DESC LIMIT 1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    // ===== Index Artifacts =====

    fn append_index(&mut self, index_urls_json: &str, index_json: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO index_data (index_urls_json, index_json, created_at) VALUES (?1, ?2, ?3)",
            params![index_urls_json, index_json, now],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn latest_index(&self) -> StorageResult<Option<IndexRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT rowid, index_urls_json, index_json, created_at
                 FROM index_data ORDER BY rowid DESC LIMIT 1",
                [],
                |row| {
                    Ok(IndexRecord {
                        id: row.get(0)?,
                        index_urls_json: row.get(1)?,
                        index_json: row.get(2)?,
                        created_at: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    fn count_indexes(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM index_data", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_in_memory() {
        let storage = SqliteStorage::new_in_memory();
        assert!(storage.is_ok());
    }

    #[test]
    fn test_visited_uses_normalized_key() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        storage.mark_visited("https://example.com/page").unwrap();

        assert!(storage.is_visited("https://example.com/page").unwrap());
        assert!(storage.is_visited("http://example.com/page#top").unwrap());
        assert!(!storage.is_visited("https://example.com/other").unwrap());
    }

    #[test]
    fn test_store_page_marks_both_urls() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        storage
            .store_page("https://example.com/old", "https://example.com/new", "<p>hi</p>")
            .unwrap();

        assert_eq!(storage.count_pages().unwrap(), 1);
        assert_eq!(storage.count_visited().unwrap(), 2);
        assert!(storage.is_visited("https://example.com/old").unwrap());
        assert!(storage.is_visited("https://example.com/new").unwrap());

        let pages = storage.load_pages().unwrap();
        assert_eq!(pages[0].url, "https://example.com/new");
        assert_eq!(pages[0].body, "<p>hi</p>");
    }

    #[test]
    fn test_store_page_without_redirect_marks_once() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        storage
            .store_page("https://example.com/", "https://example.com/", "body")
            .unwrap();
        assert_eq!(storage.visited_urls().unwrap(), vec!["https://example.com/"]);
    }

    #[test]
    fn test_duplicate_page_rejected_and_rolled_back() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        storage
            .store_page("https://example.com/a", "https://example.com/a", "one")
            .unwrap();

        let result = storage.store_page("https://example.com/b", "https://example.com/a", "two");
        assert!(matches!(result, Err(StorageError::DuplicatePage(_))));
        assert!(!storage.is_visited("https://example.com/b").unwrap());
        assert_eq!(storage.count_pages().unwrap(), 1);
    }

    #[test]
    fn test_pages_load_in_insertion_order() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        for path in ["z", "a", "m"] {
            let url = format!("https://example.com/{}", path);
            storage.store_page(&url, &url, path).unwrap();
        }

        let urls: Vec<String> = storage.load_pages().unwrap().into_iter().map(|p| p.url).collect();
        assert_eq!(
            urls,
            vec![
                "https://example.com/z",
                "https://example.com/a",
                "https://example.com/m"
            ]
        );
    }

    #[test]
    fn test_properties() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        assert_eq!(storage.get_property("finished").unwrap(), None);
        assert!(!storage.is_finished().unwrap());

        storage.set_property("finished", true).unwrap();
        assert_eq!(storage.get_property("finished").unwrap(), Some(true));
        assert!(storage.is_finished().unwrap());
    }

    #[test]
    fn test_latest_index_wins() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        assert!(storage.latest_index().unwrap().is_none());

        storage.append_index("[1]", "{}").unwrap();
        let second = storage.append_index("[2]", "{\"a\":[]}").unwrap();

        let latest = storage.latest_index().unwrap().unwrap();
        assert_eq!(latest.id, second);
        assert_eq!(latest.index_urls_json, "[2]");
        assert_eq!(storage.count_indexes().unwrap(), 2);
    }

    #[test]
    fn test_reopen_file_keeps_visited() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crawl.sqlite3");

        {
            let mut storage = SqliteStorage::new(&path).unwrap();
            storage.mark_visited("https://example.com/kept").unwrap();
        }

        let storage = SqliteStorage::new(&path).unwrap();
        assert!(storage.is_visited("https://example.com/kept").unwrap());
    }
}

//! Database schema definitions
//!
//! This module contains the SQL schema for the crawl and index store.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Raw documents keyed by the URL they were fetched from (post-redirect)
CREATE TABLE IF NOT EXISTS crawl_data (
    url TEXT PRIMARY KEY,
    html TEXT
);

-- Append-only visited set; `normalized` is the identity key used for lookups
CREATE TABLE IF NOT EXISTS visited (
    url TEXT NOT NULL,
    normalized TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_visited_normalized ON visited(normalized);

-- Crawl flags such as `finished`
CREATE TABLE IF NOT EXISTS crawl_properties (
    name TEXT NOT NULL,
    value BOOLEAN NOT NULL
);

-- Append-only history of index builds; the highest rowid is authoritative
CREATE TABLE IF NOT EXISTS index_data (
    index_urls_json TEXT NOT NULL,
    index_json TEXT NOT NULL,
    created_at TEXT NOT NULL
);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

//! site-search: a static website search engine generator
//!
//! This crate crawls a bounded set of pages reachable from seed URLs, builds a
//! weighted inverted index over their text, and exports it as JSON for a
//! browser-side search page. The same tokenizer drives indexing and querying.

pub mod config;
pub mod crawler;
pub mod html;
pub mod index;
pub mod output;
pub mod pipeline;
pub mod query;
pub mod storage;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for site-search operations
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Output directory `{}` already exists", .0.display())]
    OutputExists(PathBuf),

    #[error("Missing asset file: {}", .0.display())]
    MissingAsset(PathBuf),

    #[error("No index has been stored yet")]
    NoIndex,
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing network location in URL: {0}")]
    MissingHost(String),
}

/// Result type alias for site-search operations
pub type Result<T> = std::result::Result<T, SearchError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use index::{tokenize, DocumentMetadata, SearchIndex, Summary};
pub use query::QueryEngine;
pub use url::{normalize_url, NormalizedUrl, Scope};

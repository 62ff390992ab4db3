//! Configuration module for site-search
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file, plus validation of seed URLs.
//!
//! # Example
//!
//! ```no_run
//! use site_search::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("site-search.toml")).unwrap();
//! println!("Retries per page: {}", config.crawler.max_retries);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default, parse_config};
pub use validation::{validate, validate_seeds};

//! URL handling module for site-search
//!
//! This module provides URL normalization (the identity key used for visited
//! checks and deduplication) and the scope filter that decides which URLs a
//! crawl may fetch.

mod normalize;
mod scope;

// Re-export main functions
pub use normalize::{normalize_parsed, normalize_url, parse_url, NormalizedUrl};
pub use scope::{
    matches_extension, matches_scheme, AllowedPrefix, Scope, EXCLUDED_EXTENSIONS,
};

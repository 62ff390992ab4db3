//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry logic
//! - HTML link extraction
//! - The FIFO frontier
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod parser;

pub use coordinator::{run_crawl, CrawlReport, Coordinator};
pub use fetcher::{
    build_http_client, classify_content_type, ContentKind, FetchResult, FetchedPage, Fetcher,
    SkipReason,
};
pub use frontier::Frontier;
pub use parser::extract_links;

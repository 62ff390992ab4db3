//! Statistics generation from crawl database
//!
//! This module provides functionality for extracting and displaying
//! crawl statistics from the storage layer.

use crate::index::parse_index;
use crate::storage::CrawlStore;
use crate::Result;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Number of stored crawl records
    pub stored_pages: u64,

    /// Number of visited URLs, including rejected redirects
    pub visited_urls: u64,

    /// Whether the crawl ran until its frontier was empty
    pub finished: bool,

    /// Number of index rows written
    pub index_rows: u64,

    /// Details of the most recent index, if one was stored
    pub latest_index: Option<IndexStatistics>,
}

/// Size of one stored index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexStatistics {
    pub created_at: String,
    pub documents: usize,
    pub tokens: usize,
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
///
/// # Returns
///
/// * `Ok(CrawlStatistics)` - Successfully loaded statistics
/// * `Err(SearchError)` - Failed to query statistics or parse the index
pub fn load_statistics<S: CrawlStore>(storage: &S) -> Result<CrawlStatistics> {
    let stored_pages = storage.count_pages()?;
    let visited_urls = storage.count_visited()?;
    let finished = storage.is_finished()?;
    let index_rows = storage.count_indexes()?;

    let latest_index = match storage.latest_index()? {
        Some(record) => {
            let index = parse_index(&record.index_urls_json, &record.index_json)?;
            Some(IndexStatistics {
                created_at: record.created_at,
                documents: index.document_count(),
                tokens: index.token_count(),
            })
        }
        None => None,
    };

    Ok(CrawlStatistics {
        stored_pages,
        visited_urls,
        finished,
        index_rows,
        latest_index,
    })
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Stored pages: {}", stats.stored_pages);
    println!("  Visited URLs: {}", stats.visited_urls);
    println!(
        "  Crawl finished: {}",
        if stats.finished { "yes" } else { "no" }
    );
    println!();

    println!("Index:");
    println!("  Stored index rows: {}", stats.index_rows);
    match &stats.latest_index {
        Some(index) => {
            println!("  Latest index created: {}", index.created_at);
            println!("  Documents: {}", index.documents);
            println!("  Distinct tokens: {}", index.tokens);
        }
        None => println!("  No index stored"),
    }
    println!();

    // Visited URLs that never became a record were rejected after redirect
    let store_rate = if stats.visited_urls > 0 {
        (stats.stored_pages as f64 / stats.visited_urls as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Store Rate: {:.1}% ({} / {} visited URLs stored)",
        store_rate, stats.stored_pages, stats.visited_urls
    );
}

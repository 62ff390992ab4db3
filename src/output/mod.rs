//! Output module for exported artifacts and reports
//!
//! This module handles:
//! - Writing the index JSON files the search page loads
//! - Copying the search page's static assets
//! - Displaying crawl statistics and query results

mod export;
pub mod stats;

pub use export::{
    copy_assets, write_artifacts, write_bundled_assets, ExportedFiles, BUNDLED_ASSETS,
};
pub use stats::{load_statistics, print_statistics, CrawlStatistics, IndexStatistics};

use crate::index::DocumentMetadata;

/// Prints ranked query results to stdout
pub fn print_results(query: &str, results: &[&DocumentMetadata]) {
    println!("{} result(s) for \"{}\"\n", results.len(), query);

    for (rank, meta) in results.iter().enumerate() {
        let title = if meta.title.trim().is_empty() {
            meta.url.as_str()
        } else {
            meta.title.trim()
        };
        println!("{:>3}. {}", rank + 1, title);
        println!("     {}", meta.url);
        if let Some(summary) = meta.summary.text() {
            let snippet: String = summary.chars().take(160).collect();
            println!("     {}", snippet.replace('\t', " "));
        }
        println!();
    }
}

//! site-search main entry point
//!
//! This is the command-line interface for the static website search generator.

use anyhow::Context;
use clap::Parser;
use site_search::config::{load_config_or_default, Config};
use site_search::output::{load_statistics, print_results, print_statistics};
use site_search::pipeline::generate_site;
use site_search::storage::SqliteStorage;
use site_search::QueryEngine;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// site-search: generate a "static" website search engine
///
/// Crawls every page reachable from the given URLs without leaving them,
/// builds a weighted inverted index, and writes it as JSON next to the
/// files of a browser-side search page.
#[derive(Parser, Debug)]
#[command(name = "site-search")]
#[command(version)]
#[command(about = "Generate a \"static\" website search engine", long_about = None)]
struct Cli {
    /// Full URL(s) to crawl, e.g. https://www.example.org; each is also an allowed prefix
    #[arg(
        long,
        value_name = "URL",
        num_args = 1..,
        required_unless_present_any = ["query", "stats"]
    )]
    urls: Vec<String>,

    /// Output directory, which must not already exist
    #[arg(
        long,
        value_name = "DIR",
        required_unless_present_any = ["query", "stats"]
    )]
    output: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Search an exported index instead of generating one
    #[arg(
        long,
        value_name = "TERMS",
        requires = "index",
        conflicts_with_all = ["urls", "output", "stats"]
    )]
    query: Option<String>,

    /// Directory holding index_urls.json and index.json
    #[arg(long, value_name = "DIR")]
    index: Option<PathBuf>,

    /// Show statistics from a kept crawl database and exit
    #[arg(
        long,
        value_name = "DB",
        conflicts_with_all = ["urls", "output", "query"]
    )]
    stats: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    if let Some(db_path) = &cli.stats {
        return handle_stats(db_path);
    }

    if let Some(query) = &cli.query {
        let index_dir = cli
            .index
            .as_deref()
            .context("--index is required with --query")?;
        return handle_query(query, index_dir);
    }

    let output = cli.output.as_deref().context("--output is required")?;

    if let Some(path) = &cli.config {
        tracing::info!("Loading configuration from: {}", path.display());
    }
    let config = load_config_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;

    handle_generate(&config, &cli.urls, output).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_search=info,warn"),
            1 => EnvFilter::new("site_search=debug,info"),
            2 => EnvFilter::new("site_search=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the default mode: crawl, index, and export into `output`
async fn handle_generate(config: &Config, urls: &[String], output: &Path) -> anyhow::Result<()> {
    tracing::info!("Seed URLs: {}", urls.join(", "));

    let report = generate_site(config, urls, output)
        .await
        .with_context(|| format!("Failed to generate search site in {}", output.display()))?;

    tracing::info!(
        "Crawl: {} fetched, {} stored, {} rejected, {} skipped, {} failed",
        report.crawl.fetched,
        report.crawl.stored,
        report.crawl.rejected,
        report.crawl.skipped,
        report.crawl.failed
    );

    println!("✓ Indexed {} pages ({} distinct terms)", report.documents, report.tokens);
    println!("✓ Wrote {}", report.files.index_urls.display());
    println!("✓ Wrote {}", report.files.index.display());
    if report.assets_copied > 0 {
        println!("✓ Copied {} search page files", report.assets_copied);
    }
    if let Some(db) = &report.database {
        println!("✓ Kept crawl database at {}", db.display());
    }

    Ok(())
}

/// Handles the --query mode: searches exported artifacts
fn handle_query(query: &str, index_dir: &Path) -> anyhow::Result<()> {
    let engine = QueryEngine::from_files(index_dir)
        .with_context(|| format!("Failed to load index from {}", index_dir.display()))?;

    let results = engine.query(query);
    print_results(query, &results);

    Ok(())
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(db_path: &Path) -> anyhow::Result<()> {
    if !db_path.is_file() {
        anyhow::bail!("Database {} does not exist", db_path.display());
    }

    println!("Database: {}\n", db_path.display());

    let storage = SqliteStorage::new(db_path)
        .with_context(|| format!("Failed to open {}", db_path.display()))?;

    let stats = load_statistics(&storage)?;
    print_statistics(&stats);

    Ok(())
}

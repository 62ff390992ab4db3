//! End-to-end site generation
//!
//! Runs crawl, index, and export into a fresh output directory:
//!
//! 1. Refuse an existing output directory, then create it
//! 2. Open the crawl database inside it
//! 3. Register every seed as an allowed prefix and crawl from all seeds
//! 4. Build the index and append it to the database
//! 5. Export the latest index row as `index_urls.json` and `index.json`
//! 6. Copy the search page assets, or write the bundled ones
//! 7. Delete the crawl database unless it should be kept

use crate::config::{validate_seeds, Config};
use crate::crawler::{run_crawl, CrawlReport};
use crate::index::{build_from_store, store_index};
use crate::output::{copy_assets, write_artifacts, write_bundled_assets, ExportedFiles};
use crate::storage::open_storage;
use crate::url::Scope;
use crate::{Result, SearchError};
use std::path::{Path, PathBuf};

/// What a generation run produced
#[derive(Debug, Clone)]
pub struct GenerateReport {
    pub crawl: CrawlReport,
    pub documents: usize,
    pub tokens: usize,
    pub files: ExportedFiles,
    pub assets_copied: usize,
    /// Set when the crawl database was kept
    pub database: Option<PathBuf>,
}

/// Crawls `seeds`, indexes the result, and writes the search artifacts
///
/// # Errors
///
/// Fails with [`SearchError::OutputExists`] before doing anything else if
/// `output_dir` already exists. Store, configuration, and IO errors are fatal;
/// individual pages that cannot be fetched are skipped.
pub async fn generate_site<T: AsRef<str>>(
    config: &Config,
    seeds: &[T],
    output_dir: &Path,
) -> Result<GenerateReport> {
    validate_seeds(seeds)?;

    if output_dir.exists() {
        return Err(SearchError::OutputExists(output_dir.to_path_buf()));
    }
    std::fs::create_dir_all(output_dir)?;
    tracing::info!(dir = %output_dir.display(), "Created output directory");

    let db_path = output_dir.join(&config.output.database_name);

    let (crawl, documents, tokens, files) = {
        let mut store = open_storage(&db_path)?;

        let scope = Scope::from_seeds(seeds)?;
        let crawl = run_crawl(config, scope, seeds, &mut store).await?;

        let index = build_from_store(&store)?;
        store_index(&mut store, &index)?;

        let files = write_artifacts(&store, output_dir)?;
        (crawl, index.document_count(), index.token_count(), files)
    };

    let assets_copied = match &config.output.assets_dir {
        Some(assets_dir) => copy_assets(assets_dir, &config.output.assets, output_dir)?,
        None => {
            tracing::info!("No assets directory configured, writing the bundled search page");
            write_bundled_assets(output_dir)?
        }
    };

    let database = if config.output.keep_database {
        tracing::info!(path = %db_path.display(), "Keeping crawl database");
        Some(db_path)
    } else {
        remove_database(&db_path)?;
        None
    };

    Ok(GenerateReport {
        crawl,
        documents,
        tokens,
        files,
        assets_copied,
        database,
    })
}

/// Deletes a SQLite database and any WAL side files
fn remove_database(db_path: &Path) -> Result<()> {
    for suffix in ["", "-wal", "-shm"] {
        let mut name = db_path.as_os_str().to_owned();
        name.push(suffix);
        let path = PathBuf::from(name);
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
    }
    tracing::debug!(path = %db_path.display(), "Removed crawl database");
    Ok(())
}

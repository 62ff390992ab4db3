//! Artifact export
//!
//! Writes the latest stored index as the two JSON files the search page
//! loads, and copies the page's static assets next to them.

use crate::query::{INDEX_FILE, INDEX_URLS_FILE};
use crate::storage::CrawlStore;
use crate::{Result, SearchError};
use std::path::{Path, PathBuf};

/// Paths written by [`write_artifacts`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFiles {
    pub index_urls: PathBuf,
    pub index: PathBuf,
}

/// Writes the latest `index_data` row to `index_urls.json` and `index.json`
///
/// The stored JSON strings are written byte for byte.
///
/// # Errors
///
/// Returns [`SearchError::NoIndex`] if no index has been stored.
pub fn write_artifacts<S: CrawlStore>(store: &S, dir: &Path) -> Result<ExportedFiles> {
    let record = store.latest_index()?.ok_or(SearchError::NoIndex)?;

    let files = ExportedFiles {
        index_urls: dir.join(INDEX_URLS_FILE),
        index: dir.join(INDEX_FILE),
    };

    std::fs::write(&files.index_urls, &record.index_urls_json)?;
    std::fs::write(&files.index, &record.index_json)?;

    tracing::info!(
        index_row = record.id,
        dir = %dir.display(),
        "Wrote {} and {}",
        INDEX_URLS_FILE,
        INDEX_FILE
    );

    Ok(files)
}

/// Search page files compiled into the binary, written when no assets
/// directory is configured
pub const BUNDLED_ASSETS: &[(&str, &str)] = &[
    ("search.html", include_str!("../../ui/search.html")),
    ("search.js", include_str!("../../ui/search.js")),
    ("preload.js", include_str!("../../ui/preload.js")),
    ("search.css", include_str!("../../ui/search.css")),
];

/// Writes the bundled search page into `dest`
pub fn write_bundled_assets(dest: &Path) -> Result<usize> {
    for (name, contents) in BUNDLED_ASSETS {
        std::fs::write(dest.join(name), contents)?;
        tracing::debug!(asset = %name, "Wrote bundled asset");
    }
    Ok(BUNDLED_ASSETS.len())
}

/// Copies the named asset files from `assets_dir` into `dest`
///
/// Every asset must exist; returns the number of files copied.
pub fn copy_assets(assets_dir: &Path, assets: &[String], dest: &Path) -> Result<usize> {
    for name in assets {
        let source = assets_dir.join(name);
        if !source.is_file() {
            return Err(SearchError::MissingAsset(source));
        }
    }

    for name in assets {
        std::fs::copy(assets_dir.join(name), dest.join(name))?;
        tracing::debug!(asset = %name, "Copied asset");
    }

    Ok(assets.len())
}

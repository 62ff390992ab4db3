use crate::index::{DocumentMetadata, InvertedIndex, SearchIndex};
use crate::storage::CrawlStore;
use crate::{Result, SearchError};

/// Appends the index to the store as a new `index_data` row
///
/// Metadata is written as pretty JSON and the inverted index as compact
/// JSON. Returns the new row id.
pub fn store_index<S: CrawlStore>(store: &mut S, index: &SearchIndex) -> Result<i64> {
    tracing::info!("Storing index to database...");

    let index_urls_json = serde_json::to_string_pretty(&index.documents)?;
    let index_json = serde_json::to_string(&index.postings)?;
    let id = store.append_index(&index_urls_json, &index_json)?;

    tracing::info!(
        id,
        chars = index_urls_json.len() + index_json.len(),
        "Stored index"
    );
    Ok(id)
}

/// Rebuilds an index from its two JSON documents
pub fn parse_index(index_urls_json: &str, index_json: &str) -> serde_json::Result<SearchIndex> {
    let documents: Vec<DocumentMetadata> = serde_json::from_str(index_urls_json)?;
    let postings: InvertedIndex = serde_json::from_str(index_json)?;
    Ok(SearchIndex {
        documents,
        postings,
    })
}

/// Loads the most recently stored index
pub fn load_latest_index<S: CrawlStore>(store: &S) -> Result<SearchIndex> {
    let record = store.latest_index()?.ok_or(SearchError::NoIndex)?;
    Ok(parse_index(&record.index_urls_json, &record.index_json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexBuilder;
    use crate::storage::SqliteStorage;

    fn sample_index() -> SearchIndex {
        let mut builder = IndexBuilder::new();
        builder.add_document(
            "https://example.com/",
            "<title>Home</title>\n<meta name=\"description\" content=\"Welcome home\">\n<p>Café menu</p>",
        );
        builder.add_document("https://example.com/notes.txt", "plain  notes");
        builder.build()
    }

    #[test]
    fn test_store_and_load_round_trip() {
        let mut store = SqliteStorage::new_in_memory().unwrap();
        let index = sample_index();

        store_index(&mut store, &index).unwrap();
        let loaded = load_latest_index(&store).unwrap();

        assert_eq!(loaded, index);
    }

    #[test]
    fn test_latest_row_wins() {
        let mut store = SqliteStorage::new_in_memory().unwrap();
        store_index(&mut store, &SearchIndex::new()).unwrap();
        let index = sample_index();
        store_index(&mut store, &index).unwrap();

        assert_eq!(store.count_indexes().unwrap(), 2);
        assert_eq!(load_latest_index(&store).unwrap().document_count(), 2);
    }

    #[test]
    fn test_index_json_is_compact() {
        let mut store = SqliteStorage::new_in_memory().unwrap();
        store_index(&mut store, &sample_index()).unwrap();

        let record = store.latest_index().unwrap().unwrap();
        assert!(!record.index_json.contains(' '));
        assert!(!record.index_json.contains('\n'));
        assert!(record.index_json.starts_with("{\""));
        // Non-ASCII is kept as-is
        assert!(record.index_json.contains("\"café\""));
    }

    #[test]
    fn test_load_without_index() {
        let store = SqliteStorage::new_in_memory().unwrap();
        assert!(matches!(
            load_latest_index(&store),
            Err(SearchError::NoIndex)
        ));
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        assert!(parse_index("[", "{}").is_err());
        assert!(parse_index("[]", r#"{"x": [[0]]}"#).is_err());
    }
}

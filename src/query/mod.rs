//! Query engine over a built index
//!
//! Queries go through the same tokenizer as documents. Each matching posting
//! adds its score to the document's total, so a term repeated in the query
//! counts again. Results are ordered by descending total; documents with
//! equal totals keep the order in which they first received a score.

use crate::index::{load_latest_index, parse_index, tokenize, DocId, DocumentMetadata, SearchIndex};
use crate::storage::CrawlStore;
use crate::Result;
use std::path::Path;

/// File the document metadata is exported to
pub const INDEX_URLS_FILE: &str = "index_urls.json";
/// File the inverted index is exported to
pub const INDEX_FILE: &str = "index.json";

/// Read-only search over a [`SearchIndex`]
#[derive(Debug, Clone)]
pub struct QueryEngine {
    index: SearchIndex,
}

impl QueryEngine {
    pub fn new(index: SearchIndex) -> Self {
        Self { index }
    }

    /// Loads the latest index stored in a crawl database
    pub fn from_store<S: CrawlStore>(store: &S) -> Result<Self> {
        Ok(Self::new(load_latest_index(store)?))
    }

    /// Loads an index from its metadata and inverted index JSON
    pub fn from_json(index_urls_json: &str, index_json: &str) -> Result<Self> {
        Ok(Self::new(parse_index(index_urls_json, index_json)?))
    }

    /// Loads `index_urls.json` and `index.json` from an output directory
    pub fn from_files(dir: &Path) -> Result<Self> {
        let index_urls_json = std::fs::read_to_string(dir.join(INDEX_URLS_FILE))?;
        let index_json = std::fs::read_to_string(dir.join(INDEX_FILE))?;
        Self::from_json(&index_urls_json, &index_json)
    }

    pub fn index(&self) -> &SearchIndex {
        &self.index
    }

    /// Scores documents for a query, best first
    ///
    /// Postings that point past the end of the metadata list are ignored.
    pub fn ranked(&self, query: &str) -> Vec<(DocId, u64)> {
        let doc_count = self.index.document_count();
        let mut scores = vec![0u64; doc_count];
        let mut touched = vec![false; doc_count];
        let mut order: Vec<DocId> = Vec::new();

        for token in tokenize(query) {
            let Some(postings) = self.index.postings(&token) else {
                continue;
            };

            for posting in postings {
                let slot = posting.doc_id as usize;
                if slot >= doc_count {
                    continue;
                }
                if !touched[slot] {
                    touched[slot] = true;
                    order.push(posting.doc_id);
                }
                scores[slot] = scores[slot].saturating_add(posting.score);
            }
        }

        // Stable sort keeps first-scored order among ties
        order.sort_by(|a, b| scores[*b as usize].cmp(&scores[*a as usize]));

        order
            .into_iter()
            .map(|doc_id| (doc_id, scores[doc_id as usize]))
            .collect()
    }

    /// Runs a query and returns the matching documents, best first
    ///
    /// # Example
    ///
    /// ```
    /// use site_search::index::IndexBuilder;
    /// use site_search::QueryEngine;
    ///
    /// let mut builder = IndexBuilder::new();
    /// builder.add_document("https://example.com/a", "<p>zebra crossing</p>");
    /// builder.add_document("https://example.com/b", "<h1>Zebras</h1>");
    /// let engine = QueryEngine::new(builder.build());
    ///
    /// let results = engine.query("zebra");
    /// assert_eq!(results[0].url, "https://example.com/b");
    /// assert_eq!(results.len(), 2);
    /// ```
    pub fn query(&self, query: &str) -> Vec<&DocumentMetadata> {
        self.ranked(query)
            .into_iter()
            .filter_map(|(doc_id, _)| self.index.document(doc_id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{Posting, Summary};
    use crate::storage::MemoryStorage;

    fn doc(url: &str) -> DocumentMetadata {
        DocumentMetadata {
            url: url.to_string(),
            title: String::new(),
            summary: Summary::Meta(None),
            length: 0,
        }
    }

    fn engine(postings: Vec<(&str, Vec<(DocId, u64)>)>, docs: usize) -> QueryEngine {
        let mut index = SearchIndex::new();
        for i in 0..docs {
            index.documents.push(doc(&format!("doc{}", i)));
        }
        for (token, list) in postings {
            index.postings.insert(
                token.to_string(),
                list.into_iter().map(Posting::from).collect(),
            );
        }
        QueryEngine::new(index)
    }

    #[test]
    fn test_descending_score() {
        let engine = engine(vec![("rust", vec![(0, 1), (1, 100), (2, 10)])], 3);
        assert_eq!(engine.ranked("rust"), vec![(1, 100), (2, 10), (0, 1)]);
    }

    #[test]
    fn test_ties_keep_first_scored_order() {
        let engine = engine(vec![("alpha", vec![(2, 5), (0, 5)]), ("beta", vec![(1, 5)])], 3);
        assert_eq!(engine.ranked("alpha beta"), vec![(2, 5), (0, 5), (1, 5)]);
        assert_eq!(engine.ranked("beta alpha"), vec![(1, 5), (2, 5), (0, 5)]);
    }

    #[test]
    fn test_scores_accumulate_across_terms() {
        let engine = engine(vec![("red", vec![(0, 3), (1, 1)]), ("apple", vec![(1, 4)])], 2);
        assert_eq!(engine.ranked("red apples"), vec![(1, 5), (0, 3)]);
    }

    #[test]
    fn test_repeated_query_terms_compound() {
        let engine = engine(vec![("red", vec![(0, 3), (1, 5)]), ("blue", vec![(0, 4)])], 2);
        assert_eq!(engine.ranked("red blue"), vec![(0, 7), (1, 5)]);
        assert_eq!(engine.ranked("red red blue"), vec![(0, 10), (1, 10)]);
    }

    #[test]
    fn test_unknown_and_stopword_queries_match_nothing() {
        let engine = engine(vec![("rust", vec![(0, 1)])], 1);
        assert!(engine.query("python").is_empty());
        assert!(engine.query("the and of").is_empty());
        assert!(engine.query("").is_empty());
    }

    #[test]
    fn test_postings_without_metadata_dropped() {
        let engine = engine(vec![("ghost", vec![(5, 100), (0, 1)])], 1);
        let results = engine.query("ghost");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].url, "doc0");
    }

    #[test]
    fn test_from_json() {
        let engine = QueryEngine::from_json(
            r#"[["https://example.com/", "Home", ["meta", null], 4]]"#,
            r#"{"home":[[0,100]]}"#,
        )
        .unwrap();
        assert_eq!(engine.query("Homes")[0].title, "Home");
    }

    #[test]
    fn test_from_store_without_index() {
        let store = MemoryStorage::default();
        assert!(QueryEngine::from_store(&store).is_err());
    }

    #[test]
    fn test_from_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        assert!(QueryEngine::from_files(dir.path()).is_err());
    }
}

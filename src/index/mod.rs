//! Weighted inverted index
//!
//! Documents get dense ids in crawl store order. Each token maps to one
//! posting per document holding its weighted score, and each document id
//! maps to the metadata shown in search results.
//!
//! The JSON forms are what the browser search page reads:
//!
//! - metadata: `[[url, title, [kind, text|null], length], ...]`
//! - index: `{"token": [[doc_id, score], ...], ...}`

mod builder;
mod extract;
mod store;
mod tokenizer;

pub use builder::{build_from_store, IndexBuilder, BODY_WEIGHT, HEADING_WEIGHT, META_WEIGHT};
pub use extract::{extract_content, ExtractedContent};
pub use store::{load_latest_index, parse_index, store_index};
pub use tokenizer::{is_stopword, tokenize};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type DocId = u32;

/// Token to postings, ordered by token for stable output
pub type InvertedIndex = BTreeMap<String, Vec<Posting>>;

/// A token's score in one document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(DocId, u64)", into = "(DocId, u64)")]
pub struct Posting {
    pub doc_id: DocId,
    pub score: u64,
}

impl From<(DocId, u64)> for Posting {
    fn from((doc_id, score): (DocId, u64)) -> Self {
        Self { doc_id, score }
    }
}

impl From<Posting> for (DocId, u64) {
    fn from(posting: Posting) -> Self {
        (posting.doc_id, posting.score)
    }
}

const META_KIND: &str = "meta";
const TEXT_KIND: &str = "text";

/// Result snippet for a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "(String, Option<String>)", into = "(String, Option<String>)")]
pub enum Summary {
    /// The page's meta description, possibly absent
    Meta(Option<String>),
    /// Leading body text with whitespace runs collapsed to tabs
    Text(String),
}

impl Summary {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Meta(_) => META_KIND,
            Self::Text(_) => TEXT_KIND,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Meta(text) => text.as_deref(),
            Self::Text(text) => Some(text),
        }
    }
}

impl TryFrom<(String, Option<String>)> for Summary {
    type Error = String;

    fn try_from((kind, text): (String, Option<String>)) -> Result<Self, Self::Error> {
        match kind.as_str() {
            META_KIND => Ok(Self::Meta(text)),
            TEXT_KIND => Ok(Self::Text(text.unwrap_or_default())),
            other => Err(format!("unknown summary kind `{}`", other)),
        }
    }
}

impl From<Summary> for (String, Option<String>) {
    fn from(summary: Summary) -> Self {
        match summary {
            Summary::Meta(text) => (META_KIND.to_string(), text),
            Summary::Text(text) => (TEXT_KIND.to_string(), Some(text)),
        }
    }
}

type MetadataRow = (String, String, Summary, usize);

/// What a search result shows for one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "MetadataRow", into = "MetadataRow")]
pub struct DocumentMetadata {
    /// Final URL the page was stored under
    pub url: String,
    /// First heading (usually `<title>`), or empty
    pub title: String,
    pub summary: Summary,
    /// Characters of visible text
    pub length: usize,
}

impl From<MetadataRow> for DocumentMetadata {
    fn from((url, title, summary, length): MetadataRow) -> Self {
        Self {
            url,
            title,
            summary,
            length,
        }
    }
}

impl From<DocumentMetadata> for MetadataRow {
    fn from(meta: DocumentMetadata) -> Self {
        (meta.url, meta.title, meta.summary, meta.length)
    }
}

/// Document metadata plus the inverted index built over it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchIndex {
    /// Indexed by `DocId`
    pub documents: Vec<DocumentMetadata>,
    pub postings: InvertedIndex,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document(&self, doc_id: DocId) -> Option<&DocumentMetadata> {
        self.documents.get(doc_id as usize)
    }

    pub fn postings(&self, token: &str) -> Option<&[Posting]> {
        self.postings.get(token).map(Vec::as_slice)
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn token_count(&self) -> usize {
        self.postings.len()
    }
}

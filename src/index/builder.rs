use crate::index::extract::{extract_content, ExtractedContent};
use crate::index::tokenizer::tokenize;
use crate::index::{DocId, DocumentMetadata, Posting, SearchIndex, Summary};
use crate::storage::{CrawlStore, StorageResult};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

/// Score added for each occurrence in the visible text
pub const BODY_WEIGHT: u64 = 1;
/// Score added for each occurrence in the title or an h1-h6
pub const HEADING_WEIGHT: u64 = 100;
/// Score added for each occurrence in the meta description
pub const META_WEIGHT: u64 = 10;

const SUMMARY_CHARS: usize = 1000;

lazy_static! {
    static ref WHITESPACE_RUN_RE: Regex = Regex::new(r"\s\s+").expect("valid regex");
}

/// Accumulates documents into a [`SearchIndex`]
#[derive(Debug, Default)]
pub struct IndexBuilder {
    index: SearchIndex,
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indexes one document under the next document id
    pub fn add_document(&mut self, url: &str, raw: &str) -> DocId {
        let doc_id = self.index.documents.len() as DocId;
        let content = extract_content(raw);
        let scores = score_tokens(&content);

        tracing::debug!(url = %url, doc_id, tokens = scores.len(), "Indexed document");

        for (token, score) in scores {
            self.index
                .postings
                .entry(token)
                .or_default()
                .push(Posting { doc_id, score });
        }

        self.index.documents.push(DocumentMetadata {
            url: url.to_string(),
            title: content.headings.first().cloned().unwrap_or_default(),
            summary: summarize(&content),
            length: content.text.chars().count(),
        });

        doc_id
    }

    pub fn document_count(&self) -> usize {
        self.index.documents.len()
    }

    pub fn build(self) -> SearchIndex {
        self.index
    }
}

/// Builds an index over every stored page, in store order
pub fn build_from_store<S: CrawlStore>(store: &S) -> StorageResult<SearchIndex> {
    tracing::info!("Building index...");

    let mut builder = IndexBuilder::new();
    for record in store.load_pages()? {
        tracing::info!(url = %record.url, "Indexing");
        builder.add_document(&record.url, &record.body);
    }

    let index = builder.build();
    tracing::info!(
        documents = index.document_count(),
        tokens = index.token_count(),
        "Index built"
    );
    Ok(index)
}

/// Weighted token counts for one document
fn score_tokens(content: &ExtractedContent) -> HashMap<String, u64> {
    let mut scores: HashMap<String, u64> = HashMap::new();
    let mut add = |text: &str, weight: u64| {
        for token in tokenize(text) {
            *scores.entry(token).or_insert(0) += weight;
        }
    };

    add(&content.text, BODY_WEIGHT);
    for heading in &content.headings {
        add(heading, HEADING_WEIGHT);
    }
    if let Some(meta) = &content.meta_description {
        add(meta, META_WEIGHT);
    }

    scores
}

/// Picks the meta description, else the leading text
fn summarize(content: &ExtractedContent) -> Summary {
    match &content.meta_description {
        Some(meta) if !meta.is_empty() => Summary::Meta(Some(meta.clone())),
        meta if content.text.is_empty() => Summary::Meta(meta.clone()),
        _ => {
            let leading: String = content.text.chars().take(SUMMARY_CHARS).collect();
            Summary::Text(WHITESPACE_RUN_RE.replace_all(&leading, "\t").into_owned())
        }
    }
}

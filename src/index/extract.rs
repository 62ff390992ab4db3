//! Text extraction from crawled documents
//!
//! HTML and plain text bodies both go through the lenient HTML parser; a
//! plain text body simply ends up as one text node inside `<body>`.

use crate::html::parse_document;
use scraper::{node::Node, ElementRef, Selector};

const HEADING_SELECTOR: &str = "title, h1, h2, h3, h4, h5, h6";
const META_DESCRIPTION_SELECTOR: &str = r#"meta[name="description"]"#;

/// Searchable parts of a document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedContent {
    /// All visible text, in document order
    pub text: String,
    /// Text of the title and h1-h6 elements, in document order
    pub headings: Vec<String>,
    /// `content` of the first `<meta name="description">`, if any
    pub meta_description: Option<String>,
}

/// Extracts visible text, headings and meta description
///
/// Text inside `<script>` and `<style>` elements is ignored everywhere.
pub fn extract_content(raw: &str) -> ExtractedContent {
    let document = parse_document(raw);

    let mut text = String::new();
    push_visible_text(document.root_element(), &mut text);

    let mut headings = Vec::new();
    if let Ok(selector) = Selector::parse(HEADING_SELECTOR) {
        for element in document.select(&selector) {
            let mut heading = String::new();
            push_visible_text(element, &mut heading);
            headings.push(heading);
        }
    }

    let meta_description = Selector::parse(META_DESCRIPTION_SELECTOR)
        .ok()
        .and_then(|selector| {
            document
                .select(&selector)
                .next()
                .and_then(|meta| meta.value().attr("content"))
                .map(str::to_string)
        });

    ExtractedContent {
        text,
        headings,
        meta_description,
    }
}

fn is_invisible(name: &str) -> bool {
    matches!(name, "script" | "style")
}

/// Appends the text nodes under `element`, skipping script and style subtrees
fn push_visible_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            if !is_invisible(child_element.value().name()) {
                push_visible_text(child_element, out);
            }
        } else if let Node::Text(text) = child.value() {
            out.push_str(text);
        }
    }
}

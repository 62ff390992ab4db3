//! Document parsing shared by link extraction and indexing
//!
//! Pages are parsed the way a browser with JavaScript disabled would see
//! them, so `<noscript>` content becomes ordinary elements.

use html5ever::driver::{self, ParseOpts};
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use scraper::Html;

/// Parses a full document leniently, with scripting disabled
pub fn parse_document(raw: &str) -> Html {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            scripting_enabled: false,
            ..Default::default()
        },
        ..Default::default()
    };
    driver::parse_document(Html::new_document(), opts).one(raw)
}

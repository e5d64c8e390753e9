//! Pure extraction over a parsed document.
//!
//! Nothing here performs I/O: callers hand in a `scraper::Html` that was
//! produced by the fetcher or from a live browser's page source, and get
//! back the semantic values the page objects expose.

pub mod html;


pub use html::{extract_links, extract_sections, extract_title};

/// A parsed HTML document
pub type Document = scraper::Html;

/// Parses raw markup into a document
pub fn parse_document(markup: &str) -> Document {
    scraper::Html::parse_document(markup)
}

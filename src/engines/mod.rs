//! Per-engine extractors.
//!
//! Each engine reads a fixed set of selectors tied to its current mobile
//! markup. Extraction never fails: missing nodes give empty strings or lists.

pub mod baidu;
pub mod shenma;

pub use baidu::Baidu;
pub use shenma::Shenma;

use crate::document::Document;
use crate::site::{Site, Source};

pub trait SearchEngine {
    const SOURCE: Source;

    /// Related / expansion search terms in page order, duplicates kept.
    fn related_words(doc: &Document) -> Vec<String>;

    /// Ranked result records in page order.
    fn ranked_sites(doc: &Document) -> Vec<Site>;

    fn words_and_sites(doc: &Document) -> (Vec<String>, Vec<Site>) {
        (Self::related_words(doc), Self::ranked_sites(doc))
    }
}

/// Text of every element matching `css`.
pub(crate) fn texts(doc: &Document, css: &str) -> Vec<String> {
    doc.select(css).iter().map(|node| node.text()).collect()
}

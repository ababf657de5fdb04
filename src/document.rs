//! Body decoding and a small selection API over `scraper`.
//!
//! [`Selection`] mirrors the handful of jQuery-style operations the
//! extractors need: scoped `find`, `first` / `last` / `nth`, concatenated text
//! and attribute lookup with a default.

use std::borrow::Cow;
use std::collections::HashSet;
use std::io::Read;

use flate2::read::GzDecoder;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::error::{CrawlError, Result};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Inflate `raw` when it carries the gzip magic, otherwise borrow it as-is.
pub fn decode_body(raw: &[u8]) -> Result<Cow<'_, [u8]>> {
    if !raw.starts_with(&GZIP_MAGIC) {
        return Ok(Cow::Borrowed(raw));
    }

    let mut inflated = Vec::with_capacity(raw.len() * 4);
    GzDecoder::new(raw)
        .read_to_end(&mut inflated)
        .map_err(|e| CrawlError::MalformedDocument(format!("gzip body could not be inflated: {}", e)))?;
    debug!(compressed = raw.len(), inflated = inflated.len(), "Inflated gzip body");
    Ok(Cow::Owned(inflated))
}

/// A parsed HTML page.
pub struct Document {
    html: Html,
}

impl Document {
    /// Decode (gzip or plain) and parse a raw response body.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        let body = decode_body(raw)?;
        Ok(Self::from_html(&String::from_utf8_lossy(&body)))
    }

    pub fn from_html(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// Every element matching `css`, in document order.
    pub fn select(&self, css: &str) -> Selection<'_> {
        match compile(css) {
            Some(selector) => Selection {
                nodes: self.html.select(&selector).collect(),
            },
            None => Selection::empty(),
        }
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document").finish_non_exhaustive()
    }
}

/// An ordered set of elements borrowed from a [`Document`].
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    nodes: Vec<ElementRef<'a>>,
}

impl<'a> Selection<'a> {
    fn empty() -> Self {
        Self { nodes: Vec::new() }
    }

    fn single(node: Option<ElementRef<'a>>) -> Self {
        Self {
            nodes: node.into_iter().collect(),
        }
    }

    /// Descendants of the selected elements matching `css`, without duplicates.
    pub fn find(&self, css: &str) -> Selection<'a> {
        let Some(selector) = compile(css) else {
            return Selection::empty();
        };

        let mut seen = HashSet::new();
        let nodes = self
            .nodes
            .iter()
            .flat_map(|node| node.select(&selector))
            .filter(|found| seen.insert(found.id()))
            .collect();
        Selection { nodes }
    }

    pub fn first(&self) -> Selection<'a> {
        Self::single(self.nodes.first().copied())
    }

    pub fn last(&self) -> Selection<'a> {
        Self::single(self.nodes.last().copied())
    }

    /// The element at `index`, or an empty selection when out of range.
    pub fn nth(&self, index: usize) -> Selection<'a> {
        Self::single(self.nodes.get(index).copied())
    }

    /// Text of all selected elements concatenated, then trimmed.
    pub fn text(&self) -> String {
        let text: String = self.nodes.iter().flat_map(|node| node.text()).collect();
        text.trim().to_string()
    }

    /// `name` attribute of the first selected element, or `default`.
    pub fn attr_or(&self, name: &str, default: &str) -> String {
        self.nodes
            .first()
            .and_then(|node| node.value().attr(name))
            .unwrap_or(default)
            .to_string()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Each selected element as its own single-element selection.
    pub fn iter(&self) -> impl Iterator<Item = Selection<'a>> + '_ {
        self.nodes.iter().map(|node| Self::single(Some(*node)))
    }
}

fn compile(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(e) => {
            warn!(selector = css, error = ?e, "Invalid CSS selector");
            None
        }
    }
}

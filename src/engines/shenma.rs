//! Shenma mobile result pages (`m.sm.cn`).

use tracing::debug;

use super::{texts, SearchEngine};
use crate::document::{Document, Selection};
use crate::site::{Site, SiteFields, Source};

const SEARCH_URL: &str = "https://m.sm.cn/s";

const ABOUT_WORDS: &str = ".news-title";
const OTHER_WORDS: &str = ".c-e-btn-text";

const RESULT_CONTAINER: &str = "#results>.sc";
const TITLE: &str = ".c-header-title>span";
const DESCRIPTION: &str = ".js-c-paragraph-text";
const SOURCE_LINE: &str = ".c-e-source-l>span";
const HEADER_LINK: &str = ".c-header-inner[href]";

pub struct Shenma;

impl SearchEngine for Shenma {
    const SOURCE: Source = Source::ShenmaMobile;

    fn related_words(doc: &Document) -> Vec<String> {
        let mut words = about_words(doc);
        words.extend(other_words(doc));
        words
    }

    fn ranked_sites(doc: &Document) -> Vec<Site> {
        let sites: Vec<Site> = doc
            .select(RESULT_CONTAINER)
            .iter()
            .enumerate()
            .map(|(idx, container)| parse_container(idx, &container))
            .collect();
        debug!(count = sites.len(), "Extracted Shenma mobile results");
        sites
    }
}

/// The "related searches" block.
pub fn about_words(doc: &Document) -> Vec<String> {
    texts(doc, ABOUT_WORDS)
}

/// The "others also searched" buttons.
pub fn other_words(doc: &Document) -> Vec<String> {
    texts(doc, OTHER_WORDS)
}

/// Mobile search URL for `keyword`; `page` starts at 1.
pub fn search_url(keyword: &str, page: u32) -> String {
    format!(
        "{}?q={}&page={}",
        SEARCH_URL,
        urlencoding::encode(keyword),
        page.max(1)
    )
}

fn parse_container(rank: usize, container: &Selection<'_>) -> Site {
    let source_line = container.find(SOURCE_LINE);
    let fields = SiteFields {
        title: container.find(TITLE).nth(0).text(),
        description: container.find(DESCRIPTION).nth(0).text(),
        display_link: source_line.first().text(),
        timestamp_text: source_line.last().text(),
        resolved_link: container.find(HEADER_LINK).nth(0).attr_or("href", ""),
    };

    Site::new(rank, Shenma::SOURCE, fields)
}

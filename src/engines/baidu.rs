//! Baidu mobile result pages (`m.baidu.com`).

use serde_json::Value;
use tracing::{debug, warn};

use super::{texts, SearchEngine};
use crate::document::{Document, Selection};
use crate::site::{Site, SiteFields, Source};

const SEARCH_URL: &str = "https://m.baidu.com/s";
const RESULTS_PER_PAGE: u32 = 10;

const ABOUT_WORDS: &str = ".rw-list-container span";
const OTHER_WORDS: &str = ".span-item span";

const RESULT_CONTAINER: &str = "#results>.c-result";
const RESULT_CONTENT: &str = ".c-result-content";
const TITLE: &str = "h3";
const UPTIME: &str = ".c-line-clamp3>.c-gap-right-small";
const DESCRIPTION: &str = ".c-line-clamp3>span";
const SHOW_LINK: &str = ".c-line-clamp1>span";

/// Per-result tracking attribute carrying the destination under `mu`.
const DATA_LOG_ATTR: &str = "data-log";
const DATA_LOG_LINK_FIELD: &str = "mu";

pub struct Baidu;

impl SearchEngine for Baidu {
    const SOURCE: Source = Source::BaiduMobile;

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
            .map(|(idx, container)| parse_container(idx + 1, &container))
            .collect();
        debug!(count = sites.len(), "Extracted Baidu mobile results");
        sites
    }
}

/// The "related searches" block.
pub fn about_words(doc: &Document) -> Vec<String> {
    texts(doc, ABOUT_WORDS)
}

/// The "other people also searched" block.
pub fn other_words(doc: &Document) -> Vec<String> {
    texts(doc, OTHER_WORDS)
}

/// Mobile search URL for `keyword`; `page` starts at 1.
pub fn search_url(keyword: &str, page: u32) -> String {
    let offset = (page.max(1) - 1).saturating_mul(RESULTS_PER_PAGE);
    format!(
        "{}?word={}&pn={}",
        SEARCH_URL,
        urlencoding::encode(keyword),
        offset
    )
}

fn parse_container(rank: usize, container: &Selection<'_>) -> Site {
    let resolved_link = link_from_data_log(&container.attr_or(DATA_LOG_ATTR, ""));

    let content = container.find(RESULT_CONTENT);
    let fields = SiteFields {
        title: content.find(TITLE).text(),
        timestamp_text: content.find(UPTIME).text(),
        description: content.find(DESCRIPTION).last().text(),
        display_link: content.find(SHOW_LINK).text(),
        resolved_link,
    };

    Site::new(rank, Baidu::SOURCE, fields)
}

/// Read the destination out of a `data-log` value.
///
/// The attribute is written with single quotes, so they are swapped for
/// double quotes before decoding. Undecodable content yields an empty link.
fn link_from_data_log(raw: &str) -> String {
    let normalized = raw.replace('\'', "\"");
    let value: Value = match serde_json::from_str(&normalized) {
        Ok(value) => value,
        Err(e) => {
            warn!(data_log = %raw, error = %e, "Result data-log is not valid JSON");
            return String::new();
        }
    };

    match value.get(DATA_LOG_LINK_FIELD) {
        Some(Value::String(link)) => link.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

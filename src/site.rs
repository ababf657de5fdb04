use serde::{Deserialize, Serialize};

use crate::classify::{classify, PageType};

/// Search surface a [`Site`] was scraped from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    BaiduMobile,
    ShenmaMobile,
}

impl Source {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::BaiduMobile => "Baidu Mobile",
            Self::ShenmaMobile => "Shenma Mobile",
        }
    }
}

/// One ranked entry from a search result page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Site {
    /// Position on the page; the base (0 or 1) depends on the source
    pub rank: usize,
    pub title: String,
    pub description: String,
    /// Recency text as shown on the page, not parsed
    pub timestamp_text: String,
    resolved_link: String,
    /// Source line shown on the page, usually a domain or breadcrumb
    pub display_link: String,
    page_type: PageType,
    pub source: Source,
}

/// Field values read from one result container.
#[derive(Debug, Clone, Default)]
pub struct SiteFields {
    pub title: String,
    pub description: String,
    pub timestamp_text: String,
    pub resolved_link: String,
    pub display_link: String,
}

impl Site {
    /// Build a record; the page type is always derived from `resolved_link`.
    pub fn new(rank: usize, source: Source, fields: SiteFields) -> Self {
        let page_type = classify(&fields.resolved_link);
        Self {
            rank,
            title: fields.title,
            description: fields.description,
            timestamp_text: fields.timestamp_text,
            resolved_link: fields.resolved_link,
            display_link: fields.display_link,
            page_type,
            source,
        }
    }

    /// Best-effort destination URL, empty when unknown.
    pub fn resolved_link(&self) -> &str {
        &self.resolved_link
    }

    pub fn page_type(&self) -> PageType {
        self.page_type
    }

    /// Replace the destination URL and reclassify.
    pub fn with_resolved_link(mut self, link: String) -> Self {
        self.page_type = classify(&link);
        self.resolved_link = link;
        self
    }
}

use std::sync::Arc;

use tracing::info;

use crate::config::CrawlConfig;
use crate::document::Document;
use crate::engines::{Baidu, SearchEngine, Shenma};
use crate::error::Result;
use crate::fetcher::Fetcher;
use crate::proxy::{ProxyPicker, SecureRandomPicker};
use crate::site::Site;

/// Fetches result pages and runs the engine extractors over them.
///
/// Every method takes the proxy candidates for that call; an empty slice
/// means a direct connection. Calls share no mutable state, so one
/// `Crawler` can serve many tasks at once.
pub struct Crawler {
    fetcher: Fetcher,
}

impl Crawler {
    pub fn new(config: CrawlConfig) -> Result<Self> {
        Self::with_picker(config, Arc::new(SecureRandomPicker))
    }

    /// Use a custom proxy picker, e.g. a deterministic one in tests.
    pub fn with_picker(config: CrawlConfig, picker: Arc<dyn ProxyPicker>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            fetcher: Fetcher::new(config, picker),
        })
    }

    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    /// Fetch `url` and parse the body into a [`Document`].
    pub async fn document(&self, url: &str, proxies: &[String]) -> Result<Document> {
        let page = self.fetcher.fetch(url, proxies).await?;
        Document::parse(&page.body)
    }

    pub async fn word_list<E: SearchEngine>(&self, url: &str, proxies: &[String]) -> Result<Vec<String>> {
        let doc = self.document(url, proxies).await?;
        let words = E::related_words(&doc);
        info!(%url, source = E::SOURCE.display_name(), words = words.len(), "Extracted related words");
        Ok(words)
    }

    pub async fn sort_list<E: SearchEngine>(&self, url: &str, proxies: &[String]) -> Result<Vec<Site>> {
        let doc = self.document(url, proxies).await?;
        let sites = E::ranked_sites(&doc);
        info!(%url, source = E::SOURCE.display_name(), sites = sites.len(), "Extracted ranked results");
        Ok(sites)
    }

    /// Related words and ranked results from a single fetch.
    pub async fn word_and_sort<E: SearchEngine>(
        &self,
        url: &str,
        proxies: &[String],
    ) -> Result<(Vec<String>, Vec<Site>)> {
        let doc = self.document(url, proxies).await?;
        let (words, sites) = E::words_and_sites(&doc);
        info!(
            %url,
            source = E::SOURCE.display_name(),
            words = words.len(),
            sites = sites.len(),
            "Extracted related words and ranked results"
        );
        Ok((words, sites))
    }

    pub async fn baidu_word_list(&self, url: &str, proxies: &[String]) -> Result<Vec<String>> {
        self.word_list::<Baidu>(url, proxies).await
    }

    pub async fn baidu_sort_list(&self, url: &str, proxies: &[String]) -> Result<Vec<Site>> {
        self.sort_list::<Baidu>(url, proxies).await
    }

    pub async fn baidu_word_and_sort(
        &self,
        url: &str,
        proxies: &[String],
    ) -> Result<(Vec<String>, Vec<Site>)> {
        self.word_and_sort::<Baidu>(url, proxies).await
    }

    pub async fn shenma_word_list(&self, url: &str, proxies: &[String]) -> Result<Vec<String>> {
        self.word_list::<Shenma>(url, proxies).await
    }

    pub async fn shenma_sort_list(&self, url: &str, proxies: &[String]) -> Result<Vec<Site>> {
        self.sort_list::<Shenma>(url, proxies).await
    }

    pub async fn shenma_word_and_sort(
        &self,
        url: &str,
        proxies: &[String],
    ) -> Result<(Vec<String>, Vec<Site>)> {
        self.word_and_sort::<Shenma>(url, proxies).await
    }

    /// Recover the destination behind a tracking redirect; empty on any failure.
    pub async fn resolve_real_link(&self, redirect_url: &str, proxies: &[String]) -> String {
        self.fetcher.resolve_real_link(redirect_url, proxies).await
    }

    /// Replace each site's link with the destination behind it, when one is found.
    ///
    /// Sites whose link does not resolve keep their original link.
    pub async fn resolve_sites(&self, sites: Vec<Site>, proxies: &[String]) -> Vec<Site> {
        let mut resolved = Vec::with_capacity(sites.len());
        for site in sites {
            let real = self.resolve_real_link(site.resolved_link(), proxies).await;
            resolved.push(if real.is_empty() {
                site
            } else {
                site.with_resolved_link(real)
            });
        }
        resolved
    }
}

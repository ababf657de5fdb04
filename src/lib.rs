//! Scraper for Baidu and Shenma mobile search result pages.
//!
//! A call fetches one result page (optionally through a randomly picked
//! proxy), inflates it if gzip-encoded, parses it and runs the engine's fixed
//! selectors to produce related search terms and ranked [`Site`] records.
//! Tracking redirects can be resolved to their real destination with
//! [`Crawler::resolve_real_link`].
//!
//! ```no_run
//! use serp_crawler::{engines::baidu, CrawlConfig, Crawler};
//!
//! # async fn run() -> serp_crawler::Result<()> {
//! let crawler = Crawler::new(CrawlConfig::from_env())?;
//! let url = baidu::search_url("rust", 1);
//! let (words, sites) = crawler.baidu_word_and_sort(&url, &[]).await?;
//! for site in &sites {
//!     println!("{} {} {}", site.rank, site.title, site.page_type());
//! }
//! # let _ = words;
//! # Ok(())
//! # }
//! ```

pub mod classify;
pub mod config;
pub mod crawler;
pub mod document;
pub mod engines;
pub mod error;
pub mod fetcher;
pub mod proxy;
pub mod resolver;
pub mod site;

pub use classify::{classify, PageType};
pub use config::CrawlConfig;
pub use crawler::Crawler;
pub use document::{Document, Selection};
pub use engines::{Baidu, SearchEngine, Shenma};
pub use error::{CrawlError, Result};
pub use fetcher::{FetchedPage, Fetcher};
pub use proxy::{FixedPicker, ProxyPicker, SecureRandomPicker};
pub use resolver::RedirectOutcome;
pub use site::{Site, SiteFields, Source};

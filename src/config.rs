use std::env;
use std::time::Duration;

use crate::error::{CrawlError, Result};

/// HTTP behaviour shared by every fetch a [`Crawler`](crate::Crawler) makes.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Total attempts for one fetch, including the first (default: 3)
    pub retry_attempts: u32,
    /// Fixed pause between attempts (default: 5s)
    pub retry_delay: Duration,
    /// Timeout for a single attempt (default: 30s)
    pub request_timeout: Duration,
    /// Overrides the random mobile User-Agent when set
    pub user_agent: Option<String>,
}

impl CrawlConfig {
    /// Load configuration from the environment, reading `.env` first if present.
    ///
    /// Missing or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        let defaults = Self::default();

        Self {
            retry_attempts: env::var("CRAWL_RETRY_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.retry_attempts),
            retry_delay: env::var("CRAWL_RETRY_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.retry_delay),
            request_timeout: env::var("CRAWL_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            user_agent: env::var("CRAWL_USER_AGENT")
                .ok()
                .filter(|v| !v.trim().is_empty()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.retry_attempts == 0 {
            return Err(CrawlError::Config(
                "retry_attempts must be at least 1".to_string(),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(CrawlError::Config(
                "request_timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            retry_attempts: 3,
            retry_delay: Duration::from_secs(5),
            request_timeout: Duration::from_secs(30),
            user_agent: None,
        }
    }
}

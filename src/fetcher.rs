//! HTTP fetching with proxy rotation and a fixed-delay retry.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_ENCODING};
use reqwest::redirect::Policy;
use reqwest::{Client, StatusCode};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::CrawlConfig;
use crate::error::{CrawlError, Result};
use crate::proxy::{random_mobile_user_agent, ProxyPicker};

/// A successful (status 200) response, fully read.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL of the final response after any redirects
    pub url: String,
    pub body: Vec<u8>,
}

pub struct Fetcher {
    config: CrawlConfig,
    picker: Arc<dyn ProxyPicker>,
}

impl Fetcher {
    pub fn new(config: CrawlConfig, picker: Arc<dyn ProxyPicker>) -> Self {
        Self { config, picker }
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    /// Build a client for one call, routed through a picked proxy when
    /// `proxies` is non-empty.
    pub(crate) fn client(&self, proxies: &[String], redirect: Policy) -> Result<Client> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        // Only gzip bodies are inflated, so no other encoding is advertised.
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip"));

        let user_agent = self
            .config
            .user_agent
            .clone()
            .unwrap_or_else(|| random_mobile_user_agent().to_string());

        let mut builder = Client::builder()
            .default_headers(headers)
            .user_agent(user_agent)
            .timeout(self.config.request_timeout)
            .redirect(redirect);

        if let Some(proxy) = self.picker.pick(proxies) {
            debug!(%proxy, "Routing request through proxy");
            let proxy_config = reqwest::Proxy::all(proxy).map_err(|source| CrawlError::InvalidProxy {
                proxy: proxy.to_string(),
                source,
            })?;
            builder = builder.proxy(proxy_config);
        } else {
            // No candidates means a direct connection, ignoring *_PROXY env vars.
            builder = builder.no_proxy();
        }

        Ok(builder.build()?)
    }

    /// GET `url`, retrying on 400 and 5xx responses.
    ///
    /// Fails with [`CrawlError::UnexpectedStatus`] unless the final response is 200.
    pub async fn fetch(&self, url: &str, proxies: &[String]) -> Result<FetchedPage> {
        let client = self.client(proxies, Policy::default())?;
        let attempts = self.config.retry_attempts.max(1);
        let mut attempt = 1;

        loop {
            debug!(%url, attempt, "Fetching page");
            let response = client.get(url).send().await?;
            let status = response.status();

            if is_retryable(status) && attempt < attempts {
                warn!(
                    %url,
                    status = status.as_u16(),
                    attempt,
                    attempts,
                    delay_ms = self.config.retry_delay.as_millis() as u64,
                    "Retryable status, waiting before next attempt"
                );
                drop(response);
                sleep(self.config.retry_delay).await;
                attempt += 1;
                continue;
            }

            if status != StatusCode::OK {
                warn!(%url, status = status.as_u16(), attempt, "Fetch failed");
                return Err(CrawlError::UnexpectedStatus {
                    code: status.as_u16(),
                });
            }

            let final_url = response.url().to_string();
            let body = response.bytes().await?.to_vec();
            info!(%url, bytes = body.len(), attempt, "Fetched page");

            return Ok(FetchedPage {
                url: final_url,
                body,
            });
        }
    }
}

fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::BAD_REQUEST || status.is_server_error()
}

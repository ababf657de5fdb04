//! Redirect-destination recovery.
//!
//! Search engines wrap result links in tracking redirects. Requesting such a
//! link with redirects disabled and reading where the server tried to send us
//! recovers the real destination without loading it.

use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use reqwest::{StatusCode, Url};
use tracing::{debug, warn};

use crate::error::Result;
use crate::fetcher::Fetcher;

/// Result of a request made with redirect following disabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectOutcome {
    /// The server redirected and the redirect was not followed.
    Denied { attempted_destination: Url },
    /// The server answered without a usable redirect.
    NotRedirected { status: StatusCode },
}

impl RedirectOutcome {
    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Denied { .. })
    }
}

impl Fetcher {
    /// Issue one GET to `url` without following redirects.
    pub async fn probe_redirect(&self, url: &str, proxies: &[String]) -> Result<RedirectOutcome> {
        let client = self.client(proxies, Policy::none())?;
        let response = client.get(url).send().await?;
        let status = response.status();

        if !status.is_redirection() {
            return Ok(RedirectOutcome::NotRedirected { status });
        }

        let destination = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|location| response.url().join(location).ok());

        Ok(match destination {
            Some(attempted_destination) => RedirectOutcome::Denied {
                attempted_destination,
            },
            None => RedirectOutcome::NotRedirected { status },
        })
    }

    /// Recover the destination behind `redirect_url`.
    ///
    /// Never fails: anything other than a denied redirect is logged and yields
    /// an empty string. An empty input makes no request.
    pub async fn resolve_real_link(&self, redirect_url: &str, proxies: &[String]) -> String {
        if redirect_url.is_empty() {
            return String::new();
        }

        match self.probe_redirect(redirect_url, proxies).await {
            Ok(RedirectOutcome::Denied {
                attempted_destination,
            }) => {
                debug!(from = %redirect_url, to = %attempted_destination, "Resolved real link");
                attempted_destination.to_string()
            }
            Ok(RedirectOutcome::NotRedirected { status }) => {
                warn!(
                    url = %redirect_url,
                    status = status.as_u16(),
                    "Expected a redirect while resolving real link"
                );
                String::new()
            }
            Err(e) => {
                warn!(url = %redirect_url, error = %e, "Could not resolve real link");
                String::new()
            }
        }
    }
}

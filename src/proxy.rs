//! Proxy selection.
//!
//! Callers hand in a list of proxy URLs per request; a [`ProxyPicker`] decides
//! which one a request goes through.

use once_cell::sync::Lazy;
use rand::rngs::OsRng;
use rand::seq::SliceRandom;

pub(crate) static MOBILE_USER_AGENTS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1",
        "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Mobile Safari/537.36",
        "Mozilla/5.0 (Linux; Android 13; SM-S918B) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Mobile Safari/537.36",
        "Mozilla/5.0 (iPhone; CPU iPhone OS 16_6 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.6 Mobile/15E148 Safari/604.1",
    ]
});

const FALLBACK_USER_AGENT: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1";

/// Chooses one proxy out of a caller-supplied candidate list.
pub trait ProxyPicker: Send + Sync {
    /// Returns `None` only when `candidates` is empty.
    fn pick<'a>(&self, candidates: &'a [String]) -> Option<&'a str>;
}

/// Uniform pick backed by the operating system's secure random source.
///
/// Panics if the OS random source fails, which is treated as unrecoverable.
#[derive(Debug, Default, Clone, Copy)]
pub struct SecureRandomPicker;

impl ProxyPicker for SecureRandomPicker {
    fn pick<'a>(&self, candidates: &'a [String]) -> Option<&'a str> {
        candidates.choose(&mut OsRng).map(String::as_str)
    }
}

/// Always picks the candidate at `index`, wrapping around the list length.
#[derive(Debug, Clone, Copy)]
pub struct FixedPicker(pub usize);

impl ProxyPicker for FixedPicker {
    fn pick<'a>(&self, candidates: &'a [String]) -> Option<&'a str> {
        if candidates.is_empty() {
            return None;
        }
        Some(candidates[self.0 % candidates.len()].as_str())
    }
}

pub(crate) fn random_mobile_user_agent() -> &'static str {
    MOBILE_USER_AGENTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(FALLBACK_USER_AGENT)
}

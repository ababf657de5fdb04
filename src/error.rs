use thiserror::Error;

pub type Result<T> = std::result::Result<T, CrawlError>;

/// Failures surfaced by the fetch and parse stages.
///
/// Extraction itself never fails once a document exists: missing nodes and
/// malformed per-result data degrade to empty fields instead.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// DNS, connect, TLS, proxy or body-read failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A proxy candidate could not be turned into a proxy configuration.
    #[error("invalid proxy {proxy}: {source}")]
    InvalidProxy {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },

    /// Final response status after retries was not 200.
    #[error("unexpected status code {code}")]
    UnexpectedStatus { code: u16 },

    #[error("malformed document: {0}")]
    MalformedDocument(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl CrawlError {
    /// True for failures where no usable HTTP response was obtained.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::InvalidProxy { .. })
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { code } => Some(*code),
            _ => None,
        }
    }
}

use crate::transport::TransportError;
use refetch_config::ConfigError;
use std::time::Duration;
use thiserror::Error;

/// High-level classification of a fetch failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Non-2xx status, connection failure, or anything unrecognized.
    Network,
    /// The per-attempt deadline passed before the transport settled.
    Timeout,
    /// A 2xx body that does not decode into the expected value.
    Parse,
    /// The fetcher could not be constructed.
    Config,
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Request timed out after {after:?}")]
    Timeout {
        after: Duration,
        #[source]
        source: Option<TransportError>,
    },
    #[error("Failed to parse response body: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::Http { .. }
            | FetchError::Transport(_)
            | FetchError::Network(_) => ErrorKind::Network,
            FetchError::Timeout { .. } => ErrorKind::Timeout,
            FetchError::Parse(_) => ErrorKind::Parse,
            FetchError::Config(_) => ErrorKind::Config,
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Network | ErrorKind::Timeout)
    }
}

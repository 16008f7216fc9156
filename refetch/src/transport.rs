//! Boundary to the component that performs a single HTTP request.
//!
//! The fetcher only needs a status code, the body bytes, and a failure
//! shape it can match on. Cancellation is done by dropping the future
//! returned from [`Transport::request`], so implementations must not spawn
//! work that outlives it.
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    pub url: String,
    /// Headers in the order the caller supplied them
    pub headers: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text for diagnostics; invalid UTF-8 is replaced.
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Connection failed: {0}")]
    Connect(#[source] BoxError),
    #[error("Transport timed out")]
    TimedOut,
    #[error("Request aborted")]
    Aborted,
    #[error("Failed to read response body: {0}")]
    Body(#[source] BoxError),
    #[error("Request failed: {0}")]
    Other(#[source] BoxError),
}

impl TransportError {
    /// True for the shapes that mean "cancelled before completion".
    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::TimedOut | TransportError::Aborted)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(
        &self,
        request: &TransportRequest,
    ) -> Result<TransportResponse, TransportError>;
}

pub type AbstractTransport = Arc<dyn Transport + Send + Sync>;

//! Classify the outcome of one transport attempt.

use crate::error::FetchError;
use crate::transport::{TransportError, TransportResponse};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

/// What the retry loop should do with one attempt.
#[derive(Debug)]
pub enum AttemptOutcome<T> {
    /// Decoded value, ready to be cached and returned.
    Success(T),
    /// Record the error and try again if attempts remain.
    Retry(FetchError),
    /// Give up on the whole call immediately.
    Abort(FetchError),
}

/// A successful body kept both as raw JSON (for the cache) and decoded.
#[derive(Debug)]
pub struct Decoded<T> {
    pub value: Value,
    pub data: T,
}

/// Classify a response the transport returned.
///
/// Non-2xx statuses are retryable and never decoded. A 2xx body that does
/// not decode is a contract violation and aborts the call.
pub fn classify_response<T: DeserializeOwned>(
    response: TransportResponse,
) -> AttemptOutcome<Decoded<T>> {
    if !response.is_success() {
        return AttemptOutcome::Retry(FetchError::Http {
            status: response.status,
            body: response.text_lossy(),
        });
    }

    match decode::<T>(&response.body) {
        Ok(decoded) => AttemptOutcome::Success(decoded),
        Err(e) => AttemptOutcome::Abort(FetchError::Parse(e)),
    }
}

/// Map a transport failure into a fetch error. Cancellation shapes become
/// timeouts, everything else is a network error.
pub fn classify_transport_error(
    err: TransportError,
    timeout: Duration,
) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout {
            after: timeout,
            source: Some(err),
        }
    } else {
        FetchError::Transport(err)
    }
}

/// The attempt deadline passed before the transport settled.
pub fn timed_out(timeout: Duration) -> FetchError {
    FetchError::Timeout {
        after: timeout,
        source: None,
    }
}

fn decode<T: DeserializeOwned>(
    body: &[u8],
) -> Result<Decoded<T>, serde_json::Error> {
    let value: Value = serde_json::from_slice(body)?;
    let data = T::deserialize(&value)?;
    Ok(Decoded { value, data })
}

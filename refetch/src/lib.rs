//! # refetch - resilient cached HTTP fetching
//!
//! `refetch` wraps a single outbound GET request with response caching,
//! per-attempt timeouts and retry with exponential backoff. It is meant for
//! crawlers and API clients that hit the same JSON endpoints repeatedly and
//! have to survive flaky upstreams.
//!
//! ## Features
//!
//! - **Response cache**: fresh responses are served without touching the
//!   network; stale entries are evicted lazily. Backends are pluggable.
//! - **Per-attempt timeouts**: a slow attempt is cancelled and retried, it can
//!   never resolve late and overwrite a newer result.
//! - **Retry classification**: non-2xx statuses, connection failures and
//!   timeouts are retried; a malformed 2xx body aborts immediately.
//! - **Backoff with jitter**: `min(base * 2^(n-1), max)` spread by +/-50%.
//! - **Injected collaborators**: transport, cache store and logger are all
//!   trait objects, with reqwest, in-memory and no-op defaults.
//!
//! ## Getting Started
//!
//! ```ignore
//! use refetch::prelude::*;
//!
//! let config = FetcherConfigBuilder::default()
//!     .base_url("https://jsonplaceholder.typicode.com")
//!     .build()?;
//! let fetcher = Fetcher::new(config)?;
//! let todo: serde_json::Value =
//!     fetcher.fetch_data("/todos/1", &FetchOptions::new()).await?;
//! ```
//!
//! ## Modules
//!
//! - `backoff`: delay calculation between attempts.
//! - `classify`: turns one attempt's result into success, retry or abort.
//! - `fetcher`: the orchestrator tying cache, transport and backoff together.
//! - `http`: reqwest-backed transport (feature `http`).
//! - `key`: url resolution and cache keys.
//! - `logger`: logger trait and implementations.
//! - `transport`: the transport boundary.
pub mod backoff;
pub mod classify;
pub mod error;
pub mod fetcher;
#[cfg(feature = "http")]
pub mod http;
pub mod key;
pub mod logger;
pub mod options;
pub mod prelude;
pub mod transport;

pub use backoff::Backoff;
pub use error::{ErrorKind, FetchError};
pub use fetcher::{Fetcher, FetcherBuilder};
pub use logger::{AbstractLogger, Logger, NoopLogger, TracingLogger};
pub use options::{FetchOptions, FetchOptionsBuilder};
pub use refetch_cache as cache;
pub use refetch_config as config;
pub use transport::{
    AbstractTransport, Transport, TransportError, TransportRequest,
    TransportResponse,
};
// re-export
pub use async_trait;
#[cfg(feature = "http")]
pub use reqwest;
pub use serde_json;
pub use tracing;

pub use crate::backoff::Backoff;
pub use crate::error::{ErrorKind, FetchError};
pub use crate::fetcher::{Fetcher, FetcherBuilder};
#[cfg(feature = "http")]
pub use crate::http::{HttpClientParams, ReqwestTransport};
pub use crate::logger::{Logger, NoopLogger, TracingLogger};
pub use crate::options::{FetchOptions, FetchOptionsBuilder};
pub use crate::transport::{
    Transport, TransportError, TransportRequest, TransportResponse,
};
pub use refetch_cache::{CacheEntry, CacheError, CacheStore, InMemoryCache};
pub use refetch_config::{ConfigError, FetcherConfig, FetcherConfigBuilder};

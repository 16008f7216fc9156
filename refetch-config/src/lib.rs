pub mod config;

pub use config::{
    ConfigError, DEFAULT_BASE_BACKOFF_MS, DEFAULT_CACHE_TTL_MS,
    DEFAULT_MAX_BACKOFF_MS, DEFAULT_MAX_RETRIES, FetcherConfig,
    FetcherConfigBuilder, lookup,
};

//! Cached, retrying GET client.
//!
//! A call flows through:
//! 1) resolve url and cache key
//! 2) serve from cache when a fresh entry exists
//! 3) otherwise run up to `max_retries + 1` attempts, each bounded by the
//!    per-call timeout, sleeping with backoff between retryable failures
//! 4) cache the first successfully decoded body and return it
use crate::backoff::Backoff;
use crate::classify::{
    AttemptOutcome, Decoded, classify_response, classify_transport_error, timed_out,
};
use crate::error::FetchError;
use crate::key::{cache_key, resolve_url};
use crate::logger::{AbstractLogger, NoopLogger};
use crate::options::FetchOptions;
use crate::transport::{AbstractTransport, TransportRequest};
use rand::{SeedableRng, rngs::StdRng};
use refetch_cache::{AbstractCacheStore, InMemoryCache};
use refetch_config::FetcherConfig;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::instrument;

const METHOD: &str = "GET";

pub struct Fetcher {
    config: FetcherConfig,
    backoff: Backoff,
    transport: AbstractTransport,
    cache: AbstractCacheStore<Value>,
    logger: AbstractLogger,
    rng: Mutex<StdRng>,
}

impl Fetcher {
    pub fn builder(config: FetcherConfig) -> FetcherBuilder {
        FetcherBuilder::new(config)
    }

    /// Fetcher with the reqwest transport, in-memory cache and no logging.
    #[cfg(feature = "http")]
    pub fn new(config: FetcherConfig) -> Result<Self, FetchError> {
        Self::builder(config).build()
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    pub fn resolve_url(&self, path: &str) -> String {
        resolve_url(self.config.base_url.as_deref(), path)
    }

    pub fn cache_key(&self, path: &str, options: &FetchOptions) -> String {
        cache_key(METHOD, &self.resolve_url(path), &options.headers)
    }

    /// Fetch `path` and decode the JSON body into `T`.
    #[instrument(level = "debug", skip(self, options))]
    pub async fn fetch_data<T>(
        &self,
        path: &str,
        options: &FetchOptions,
    ) -> Result<T, FetchError>
    where
        T: DeserializeOwned,
    {
        let url = self.resolve_url(path);
        let key = cache_key(METHOD, &url, &options.headers);

        if let Some(value) = self.cached(&key).await {
            match serde_json::from_value(value) {
                Ok(data) => return Ok(data),
                Err(e) => {
                    // Treated as a miss; the entry is dropped and refetched.
                    self.logger.warn(&format!(
                        "cached value for {key} does not decode: {e}"
                    ));
                    if let Err(e) = self.cache.delete(&key).await {
                        self.logger
                            .warn(&format!("failed to delete cache {key}: {e}"));
                    }
                }
            }
        }

        let request = TransportRequest {
            url,
            headers: options.headers.clone(),
        };
        let Decoded { value, data } =
            self.fetch_with_retry(&request, options).await?;

        if let Err(e) = self.cache.set(&key, value, self.config.cache_ttl()).await {
            self.logger.warn(&format!("failed to set cache {key}: {e}"));
        }

        Ok(data)
    }

    /// Untyped variant of [`Fetcher::fetch_data`].
    pub async fn fetch_value(
        &self,
        path: &str,
        options: &FetchOptions,
    ) -> Result<Value, FetchError> {
        self.fetch_data::<Value>(path, options).await
    }

    /// Drop the cached response for this request, if any.
    pub async fn invalidate(&self, path: &str, options: &FetchOptions) {
        let key = self.cache_key(path, options);
        if let Err(e) = self.cache.delete(&key).await {
            self.logger.warn(&format!("failed to delete cache {key}: {e}"));
        }
    }

    async fn cached(&self, key: &str) -> Option<Value> {
        match self.cache.get(key).await {
            Ok(Some(entry)) => {
                self.logger.info(&format!("cache hit {key}"));
                Some(entry.value)
            }
            Ok(None) => {
                self.logger.info(&format!("cache miss {key}"));
                None
            }
            Err(e) => {
                self.logger.warn(&format!("cache error {key}: {e}"));
                None
            }
        }
    }

    async fn fetch_with_retry<T>(
        &self,
        request: &TransportRequest,
        options: &FetchOptions,
    ) -> Result<Decoded<T>, FetchError>
    where
        T: DeserializeOwned,
    {
        let timeout = options.timeout();
        let attempts = self.config.max_attempts();
        let started = Instant::now();
        let mut last_error: Option<FetchError> = None;

        for attempt in 1..=attempts {
            self.logger.info(&format!(
                "fetch attempt {attempt}/{attempts} {}",
                request.url
            ));

            // Dropping the transport future on timeout cancels the request,
            // so a late response can never be observed.
            let outcome =
                match tokio::time::timeout(timeout, self.transport.request(request))
                    .await
                {
                    Ok(Ok(response)) => classify_response::<T>(response),
                    Ok(Err(e)) => {
                        AttemptOutcome::Retry(classify_transport_error(e, timeout))
                    }
                    Err(_elapsed) => AttemptOutcome::Retry(timed_out(timeout)),
                };

            match outcome {
                AttemptOutcome::Success(decoded) => return Ok(decoded),
                AttemptOutcome::Abort(e) => {
                    self.logger
                        .error(&format!("parse error, aborting retries: {e}"));
                    return Err(e);
                }
                AttemptOutcome::Retry(e) => {
                    if attempt < attempts {
                        let delay = self.backoff_delay(attempt);
                        self.logger.warn(&format!(
                            "retrying after {}ms (attempt {}/{}): {}",
                            delay.as_millis(),
                            attempt,
                            attempts,
                            e
                        ));
                        last_error = Some(e);
                        tokio::time::sleep(delay).await;
                    } else {
                        last_error = Some(e);
                    }
                }
            }
        }

        let err = last_error
            .unwrap_or_else(|| FetchError::Network("failed to fetch".to_string()));
        self.logger.error(&format!(
            "retries exhausted after {:?} for {}: {err}",
            started.elapsed(),
            request.url
        ));
        Err(err)
    }

    fn backoff_delay(&self, completed_attempts: u32) -> Duration {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        self.backoff.delay_with(completed_attempts, &mut *rng)
    }
}

impl std::fmt::Debug for Fetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fetcher")
            .field("config", &self.config)
            .field("backoff", &self.backoff)
            .field("logger", &self.logger)
            .finish()
    }
}

/// Assembles a [`Fetcher`] from a config plus optional collaborators.
pub struct FetcherBuilder {
    config: FetcherConfig,
    transport: Option<AbstractTransport>,
    cache: Option<AbstractCacheStore<Value>>,
    logger: Option<AbstractLogger>,
    rng_seed: Option<u64>,
}

impl FetcherBuilder {
    pub fn new(config: FetcherConfig) -> Self {
        Self {
            config,
            transport: None,
            cache: None,
            logger: None,
            rng_seed: None,
        }
    }

    pub fn transport(mut self, transport: AbstractTransport) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn cache(mut self, cache: AbstractCacheStore<Value>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn logger(mut self, logger: AbstractLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Seed the jitter source so backoff delays are reproducible.
    pub fn rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<Fetcher, FetchError> {
        self.config.validate()?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => default_transport()?,
        };
        let rng = match self.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Ok(Fetcher {
            backoff: Backoff::from_config(&self.config),
            config: self.config,
            transport,
            cache: self.cache.unwrap_or_else(|| Arc::new(InMemoryCache::new())),
            logger: self.logger.unwrap_or_else(|| Arc::new(NoopLogger)),
            rng: Mutex::new(rng),
        })
    }
}

#[cfg(feature = "http")]
fn default_transport() -> Result<AbstractTransport, FetchError> {
    Ok(Arc::new(crate::http::ReqwestTransport::new()?))
}

#[cfg(not(feature = "http"))]
fn default_transport() -> Result<AbstractTransport, FetchError> {
    Err(FetchError::Config(refetch_config::ConfigError::Invalid(
        "no transport configured and the `http` feature is disabled".to_string(),
    )))
}

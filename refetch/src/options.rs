use derive_builder::Builder;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Per-call options for a fetch.
#[derive(Builder, Clone, Debug, PartialEq, Eq)]
#[builder(public, setter(into))]
pub struct FetchOptions {
    /// Request headers, sent in this order
    #[builder(default)]
    pub headers: Vec<(String, String)>,
    /// Deadline for each individual attempt, not for the whole call
    #[builder(default = "DEFAULT_TIMEOUT_MS")]
    pub timeout_ms: u64,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            headers: Vec::new(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl FetchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

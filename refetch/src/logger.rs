//! Logger seam for fetch diagnostics.
//!
//! A fetcher never reaches for a global logger: it gets one injected and
//! falls back to [`NoopLogger`]. [`TracingLogger`] forwards to `tracing`.
use std::{fmt, sync::Arc};

pub trait Logger: Send + Sync + fmt::Debug {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

pub type AbstractLogger = Arc<dyn Logger + Send + Sync>;

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn info(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}

/// Emits `tracing` events with a `tag` field identifying the client.
#[derive(Debug, Clone)]
pub struct TracingLogger {
    tag: String,
}

impl TracingLogger {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl Default for TracingLogger {
    fn default() -> Self {
        Self::new("refetch")
    }
}

impl Logger for TracingLogger {
    fn info(&self, message: &str) {
        tracing::info!(tag = %self.tag, "{}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!(tag = %self.tag, "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(tag = %self.tag, "{}", message);
    }
}

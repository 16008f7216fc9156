//! Fetch a todo twice from jsonplaceholder; the second call is served from cache.
//! Run with `RUST_LOG=debug` to see every attempt.

use std::sync::Arc;

use refetch::{
    FetchOptions, Fetcher, TracingLogger, config::FetcherConfig, tracing,
};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Todo {
    user_id: u32,
    id: u32,
    title: String,
    completed: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path =
        concat!(env!("CARGO_MANIFEST_DIR"), "/demos/fetcher.yml");
    let config = FetcherConfig::load_config(config_path)?;
    let fetcher = Fetcher::builder(config)
        .logger(Arc::new(TracingLogger::new("fetch_todo")))
        .build()?;

    let options = FetchOptions::new()
        .with_header("Accept", "application/json")
        .with_timeout_ms(5_000);

    for round in 1..=2 {
        let todo: Todo = fetcher.fetch_data("/todos/1", &options).await?;
        tracing::info!(
            round,
            id = todo.id,
            user_id = todo.user_id,
            completed = todo.completed,
            "{}",
            todo.title
        );
    }

    Ok(())
}

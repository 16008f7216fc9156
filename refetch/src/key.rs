//! URL resolution and cache key derivation.
use serde_json::Value;

/// Join `path` onto `base_url` with exactly one slash between them.
///
/// Without a base the path is used verbatim.
pub fn resolve_url(base_url: Option<&str>, path: &str) -> String {
    match base_url {
        Some(base) => format!(
            "{}/{}",
            base.trim_end_matches('/'),
            path.trim_start_matches('/')
        ),
        None => path.to_string(),
    }
}

/// Deterministic key for a request: `METHOD:url:[[name,value],...]`.
///
/// Header names are lower-cased and the pairs sorted, so header insertion
/// order does not produce distinct keys.
pub fn cache_key(method: &str, url: &str, headers: &[(String, String)]) -> String {
    let mut pairs: Vec<(String, &str)> = headers
        .iter()
        .map(|(name, value)| (name.to_ascii_lowercase(), value.as_str()))
        .collect();
    pairs.sort_unstable();

    let serialized = Value::Array(
        pairs
            .into_iter()
            .map(|(name, value)| Value::Array(vec![name.into(), value.into()]))
            .collect(),
    );
    format!("{method}:{url}:{serialized}")
}

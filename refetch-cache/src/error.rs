use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache backend unavailable: {0}")]
    Unavailable(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Cache lock poisoned: {0}")]
    Poisoned(String),
}

use thiserror::Error;

/// Errors surfaced by the task store, memo lists and persistence layer.
///
/// Every variant is recoverable. A failed operation leaves the in-memory
/// state untouched.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("no task or memo with id {0}")]
    NotFound(String),

    #[error("unreadable stored data: {0}")]
    Deserialization(#[source] serde_json::Error),

    #[error("failed to serialize data: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

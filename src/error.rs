use thiserror::Error;

/// Errors returned by the fallible post store operations.
///
/// `set` and `subscribe` never fail; these cover JSON loading, id-based
/// edits and configuration.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to decode posts: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("no post with id {0}")]
    PostNotFound(u64),

    #[error("invalid store config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

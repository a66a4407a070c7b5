use thiserror::Error;

#[derive(Error, Debug)]
pub enum AccessError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unsupported course schema version: {0}")]
    UnsupportedSchema(u64),

    #[error("No signed-in session found")]
    NoSessionFound,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AccessError>;

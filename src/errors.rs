use thiserror::Error;

/// Unified error type for the tracker core.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Rusqlite error: {0}")]
    Rusqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL open error: {0}")]
    UrlOpen(String),

    #[error("User not found: {id}")]
    UserNotFound { id: String },

    #[error("Drink not found: {id}")]
    DrinkNotFound { id: String },

    #[error("Drink '{name}' is out of stock")]
    OutOfStock { name: String },
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

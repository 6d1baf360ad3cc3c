use thiserror::Error;

/// Relnote error types
#[derive(Error, Debug)]
pub enum RelnoteError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("State file error: {0}")]
    State(String),

    #[error("Fragment error: {0}")]
    Fragment(String),

    #[error("Check failed: {0}")]
    Check(String),

    #[error("Release error: {0}")]
    Release(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for relnote operations
pub type Result<T> = std::result::Result<T, RelnoteError>;

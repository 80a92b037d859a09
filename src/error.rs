use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Template rendering failed: {0}")]
    Template(#[from] askama::Error),
}

pub type Result<T> = std::result::Result<T, SiteError>;

//! Error types for dropboxdol.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the library and CLI.
#[derive(Error, Debug)]
pub enum Error {
    // Path resolution errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(
        "The file '{}' does not exist. Please verify the path and the Dropbox root directory.",
        .0.display()
    )]
    NotFound(PathBuf),

    #[error(
        "Failed to compute the relative Dropbox path from '{}' and '{}': {reason}",
        .local.display(),
        .root.display()
    )]
    Computation {
        local: PathBuf,
        root: PathBuf,
        reason: String,
    },

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    // Store errors
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Invalid text encoding: {0}")]
    Encoding(String),

    // API errors
    #[error("API error: {0}")]
    Api(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    // URL parsing errors
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether this error means the requested key or file is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::KeyNotFound(_) | Error::NotFound(_))
    }
}

/// Process exit codes for the CLI.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const API_ERROR: i32 = 2;
    pub const CONFIG_ERROR: i32 = 3;
    pub const INPUT_ERROR: i32 = 4;
    pub const UNEXPECTED_ERROR: i32 = 5;
}

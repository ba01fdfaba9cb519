//! Error types for impress-citekey
//!
//! Key generation itself never fails: missing data degrades to empty
//! strings. Only configuration loading and validation return errors.

use thiserror::Error;

/// Result type alias for configuration operations
pub type Result<T> = std::result::Result<T, CiteKeyError>;

/// Main error type for impress-citekey
#[derive(Error, Debug)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Error), uniffi(flat_error))]
pub enum CiteKeyError {
    /// The user-supplied post-processing regex does not compile
    #[error("Invalid key pattern regex '{pattern}': {message}")]
    InvalidRegex { pattern: String, message: String },

    /// A configuration value is out of its valid range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// TOML configuration could not be parsed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON input could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration or record file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// src/error.rs

//! Unified error handling for the search engine.
//!
//! Only failures of a whole operation surface as [`AppError`]. Per-site
//! failures are encoded in the probe result instead.

use std::fmt;
use std::path::Path;

use thiserror::Error;

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client could not be built
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Site catalog could not be loaded
    #[error("Catalog unavailable ({path}): {message}")]
    Catalog { path: String, message: String },

    /// A single catalog entry is malformed
    #[error("Invalid site definition '{site}': {message}")]
    Site { site: String, message: String },

    /// Search submitted after the worker pool was shut down
    #[error("Worker pool has been shut down")]
    PoolClosed,
}

impl AppError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a catalog load error for the given source path.
    pub fn catalog(path: impl AsRef<Path>, message: impl fmt::Display) -> Self {
        Self::Catalog {
            path: path.as_ref().display().to_string(),
            message: message.to_string(),
        }
    }

    /// Create an error for a malformed site entry.
    pub fn site(site: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Site {
            site: site.into(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_mentions_path() {
        let err = AppError::catalog("data/sites.json", "file not found");
        assert_eq!(
            err.to_string(),
            "Catalog unavailable (data/sites.json): file not found"
        );
    }

    #[test]
    fn test_site_error_mentions_site() {
        let err = AppError::site("GitHub", "missing field `url`");
        assert!(err.to_string().contains("'GitHub'"));
    }
}

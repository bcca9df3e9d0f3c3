//! Martech-Sync: a marketing analytics batch loader
//!
//! This crate implements a scheduled batch job that pulls data from an
//! ad-platform API and a newsletter-platform API, reshapes the combined
//! results into a fixed set of relational tables, and performs a full
//! truncate-and-reload into Postgres.

pub mod api;
pub mod config;
pub mod harvest;
pub mod load;
pub mod model;
pub mod project;
pub mod throttle;

use thiserror::Error;

/// Main error type for Martech-Sync operations
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised while talking to the external APIs
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error for {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Platform error {code} for {url}: {message}")]
    Platform {
        url: String,
        code: i64,
        message: String,
    },

    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid URL {url}: {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Max retries exceeded after {attempts} attempts")]
    MaxRetriesExceeded { attempts: u32 },
}

/// Platform error code for "user request limit reached"
pub const TRANSIENT_RATE_CODE: i64 = 17;
/// Platform error code for "ads API request throttled"
pub const TRANSIENT_THROTTLE_CODE: i64 = 80004;

impl ApiError {
    /// Returns true for the two well-known transient rate-limit error codes.
    /// These are recovered locally by the retry loop; everything else
    /// propagates immediately.
    pub fn is_transient_rate_limit(&self) -> bool {
        matches!(
            self,
            ApiError::Platform {
                code: TRANSIENT_RATE_CODE | TRANSIENT_THROTTLE_CODE,
                ..
            }
        )
    }
}

/// Result type alias for Martech-Sync operations
pub type Result<T> = std::result::Result<T, SyncError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for API operations
pub type ApiResult<T> = std::result::Result<T, ApiError>;

// Re-export commonly used types
pub use config::Config;
pub use throttle::{call_with_backoff, UsageSample};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_codes_are_recognized() {
        let err = ApiError::Platform {
            url: "http://x".into(),
            code: 17,
            message: "limit".into(),
        };
        assert!(err.is_transient_rate_limit());

        let err = ApiError::Platform {
            url: "http://x".into(),
            code: 80004,
            message: "throttled".into(),
        };
        assert!(err.is_transient_rate_limit());
    }

    #[test]
    fn other_platform_errors_are_not_transient() {
        let err = ApiError::Platform {
            url: "http://x".into(),
            code: 190,
            message: "bad token".into(),
        };
        assert!(!err.is_transient_rate_limit());

        let err = ApiError::MaxRetriesExceeded { attempts: 5 };
        assert!(!err.is_transient_rate_limit());
    }
}

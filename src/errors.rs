/*!
 * Error types for the bilisub application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when talking to the video platform
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Non-success transport status
    #[error("HTTP error: {status_code} - {message}")]
    HttpStatus {
        /// HTTP status code
        status_code: u16,
        /// Response body or reason phrase
        message: String,
    },

    /// Non-zero `code` field inside a JSON envelope
    #[error("API responded with error: {code} - {message}")]
    ApiStatus {
        /// Platform status code
        code: i64,
        /// Error message from the API
        message: String,
    },

    /// Server is throttling us
    #[error("Rate limit exceeded: {message}")]
    RateLimitExceeded {
        message: String,
        /// Value of a `Retry-After` header, if the server sent one
        retry_after_secs: Option<u64>,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),
}

impl ProviderError {
    /// Whether a retry has any chance of succeeding
    pub fn is_throttling(&self) -> bool {
        matches!(
            self,
            Self::RateLimitExceeded { .. } | Self::ConnectionError(_)
        ) || matches!(self, Self::HttpStatus { status_code, .. } if *status_code >= 500)
    }
}

/// Errors that can occur during subtitle conversion
#[derive(Error, Debug, PartialEq)]
pub enum SubtitleError {
    /// A cue (or the document, at index 0) is missing a field or has the wrong type
    #[error("Malformed timed-text entry {index}: missing or invalid '{field}'")]
    MalformedEntry {
        /// 1-based cue position, 0 for the document itself
        index: usize,
        field: &'static str,
    },

    /// Offset cannot be rendered as a timestamp
    #[error("Invalid timestamp offset: {0}")]
    InvalidTimestamp(f64),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the platform API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from subtitle conversion
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Identifier that is not a BV id
    #[error("Invalid BV ID format: {0}. It should start with 'BV'")]
    InvalidIdentifier(String),

    /// Configuration is unusable
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

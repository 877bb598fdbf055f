//! Error types for `OAuth 1.0a` operations.
//!
//! Only caller mistakes are errors. A transport failure, a rejected request
//! or a partial response is an ordinary return value: an absent request token
//! or [`AccessCredential::null`](crate::AccessCredential::null).

/// Result type alias for `OAuth 1.0a` operations.
pub type Result<T> = std::result::Result<T, Error>;

/// `OAuth 1.0a` error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP client construction error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A required argument or capability is missing.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// URL parsing error.
    #[error("URL error: {0}")]
    UrlError(#[from] url::ParseError),
}

impl Error {
    /// Creates an invalid-argument error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

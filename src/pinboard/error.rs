//! Error types for bookmarking API calls.

use thiserror::Error;

/// Errors produced by API calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure, non-success status, or undecodable response body.
    #[error("API request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured base URL or a joined endpoint path is invalid.
    #[error("invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

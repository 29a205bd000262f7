//! Error types for the Adzuna client.

use thiserror::Error;

/// Result type for Adzuna client operations.
pub type Result<T> = std::result::Result<T, AdzunaError>;

#[derive(Debug, Error)]
pub enum AdzunaError {
    /// Connection failed, timed out, or the request could not be built
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response (bad credentials, unknown country, quota exceeded)
    #[error("Adzuna API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Body was not the JSON payload we expected
    #[error("Parse error: {0}")]
    Parse(String),
}

//! Error types for the card data-source client.

use thiserror::Error;

/// Result type alias for data-source operations.
pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Request could not be sent or the connection failed.
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a status other than success or "no match".
    #[error("Unexpected response status {status} from {endpoint}")]
    Status {
        /// Endpoint path, relative to the base URL
        endpoint: String,
        /// HTTP status code
        status: u16,
    },

    /// Response body could not be decoded.
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Response cache I/O failure.
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),
}

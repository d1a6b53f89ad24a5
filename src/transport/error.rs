//! Error types for HTTP operations.

use thiserror::Error;

/// Error type for a single HTTP exchange.
///
/// Describes what went wrong at the transport level without dictating
/// recovery strategy; the delivery engine retries all of them.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network connection failed.
    ///
    /// This includes DNS resolution failures, connection refused,
    /// TLS handshake failures and body read errors.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Request timed out.
    ///
    /// Either the connect timeout or the overall request timeout elapsed.
    #[error("Request timed out")]
    Timeout,

    /// The request could not be built from the given URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

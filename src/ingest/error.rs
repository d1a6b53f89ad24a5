//! Error types for signing and delivery.

use thiserror::Error;

use crate::transport::HttpError;

/// Invalid credential material supplied at construction.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// No shared key was given.
    #[error("Shared key is empty")]
    MissingKey,

    /// The shared key is not valid base64.
    #[error("Shared key is not valid base64: {0}")]
    InvalidKey(#[from] base64::DecodeError),

    /// HMAC rejected the decoded key.
    #[error("Shared key cannot be used as an HMAC key")]
    KeyLength,

    /// No workspace id was given.
    #[error("Workspace id is empty")]
    MissingWorkspace,

    /// The workspace id cannot appear in a host name or authorization header.
    #[error("Invalid workspace id '{0}': only ASCII letters, digits and '-' are allowed")]
    InvalidWorkspace(String),
}

/// A request header could not be formed.
#[derive(Debug, Error)]
#[error("Invalid value for header {name}: {source}")]
pub struct BuildError {
    /// Header being built
    pub name: &'static str,
    /// Underlying header error
    #[source]
    pub source: http::header::InvalidHeaderValue,
}

/// Why a single delivery attempt failed.
#[derive(Debug, Error)]
pub enum AttemptError {
    /// The exchange itself failed (connect, TLS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    /// The endpoint answered with something other than 200 or 202.
    #[error("Rejected with status {status}")]
    Status {
        /// HTTP status code
        status: http::StatusCode,
        /// Response body, if UTF-8
        body: Option<String>,
    },
}

/// Final outcome of a failed delivery.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Every attempt failed. Nothing more can be done for this adapter
    /// without outside intervention.
    #[error("Delivery abandoned after {attempts} attempts: {last_error}")]
    Exhausted {
        /// Number of attempts made
        attempts: u32,
        /// Failure of the final attempt
        #[source]
        last_error: AttemptError,
    },

    /// The request for this envelope could not be built.
    #[error("Failed to build request: {0}")]
    Build(#[from] BuildError),
}

impl DeliveryError {
    /// Returns true if the adapter cannot continue after this error.
    #[must_use]
    pub const fn is_unrecoverable(&self) -> bool {
        matches!(self, Self::Exhausted { .. })
    }
}

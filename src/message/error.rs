//! Error types for message transformation.

use thiserror::Error;

/// A message whose content cannot be shipped.
///
/// Retrying cannot fix these, so the consumer logs them and moves on
/// to the next message.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The envelope could not be serialized to JSON.
    #[error("Could not serialize envelope: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The payload's `Type` field cannot be sent as a `Log-Type` header.
    #[error("Invalid log type '{value}': {source}")]
    InvalidLogType {
        /// The offending value
        value: String,
        /// Underlying header error
        #[source]
        source: http::header::InvalidHeaderValue,
    },
}

//! Adapter construction and the top-level streaming entry point.
//!
//! [`OmsAdapter::new`] is the factory an embedding application calls once
//! with an [`AdapterConfig`]. All configuration errors surface here, never
//! while messages are being shipped.

use std::fmt;

use thiserror::Error;
use tokio::sync::mpsc::UnboundedReceiver;
use url::Url;

use crate::ingest::{
    Credential, CredentialError, DeliveryEngine, RequestBuilder, RetryPolicy, endpoint_for,
};
use crate::message::{LogMessage, LogType, Transformer};
use crate::stream::{StreamError, StreamStats, consume};
use crate::transport::{ReqwestClient, Timeouts};

#[cfg(test)]
#[path = "adapter_tests.rs"]
mod tests;

/// Error raised while constructing an adapter.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The workspace id or shared key is missing or malformed.
    #[error("Invalid credential: {0}")]
    Credential(#[from] CredentialError),

    /// The ingestion endpoint URL could not be formed.
    #[error("Invalid endpoint '{url}': {reason}")]
    Endpoint {
        /// URL that failed to parse
        url: String,
        /// Reason for invalidity
        reason: String,
    },

    /// The HTTP client could not be initialized.
    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Everything an adapter needs, supplied once at construction.
#[derive(Clone)]
pub struct AdapterConfig {
    /// Log Analytics workspace id
    pub workspace_id: String,
    /// Base64 shared key of the workspace
    pub shared_key: String,
    /// Endpoint override; derived from the workspace id when `None`
    pub endpoint: Option<Url>,
    /// Connect and request timeouts
    pub timeouts: Timeouts,
    /// Attempts and back-off per message
    pub retry_policy: RetryPolicy,
    /// Log type for payloads that do not name one
    pub default_log_type: LogType,
}

impl fmt::Debug for AdapterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterConfig")
            .field("workspace_id", &self.workspace_id)
            .field("shared_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("timeouts", &self.timeouts)
            .field("retry_policy", &self.retry_policy)
            .field("default_log_type", &self.default_log_type)
            .finish()
    }
}

impl AdapterConfig {
    /// Creates a configuration with default endpoint, timeouts and retry policy.
    #[must_use]
    pub fn new(workspace_id: impl Into<String>, shared_key: impl Into<String>) -> Self {
        Self {
            workspace_id: workspace_id.into(),
            shared_key: shared_key.into(),
            endpoint: None,
            timeouts: Timeouts::default(),
            retry_policy: RetryPolicy::default(),
            default_log_type: LogType::default(),
        }
    }

    /// Returns the URL requests are sent to.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Endpoint`] if no override is set and the
    /// workspace id does not form a valid host.
    pub fn resolve_endpoint(&self) -> Result<Url, AdapterError> {
        if let Some(ref url) = self.endpoint {
            return Ok(url.clone());
        }
        endpoint_for(&self.workspace_id).map_err(|e| AdapterError::Endpoint {
            url: self.workspace_id.clone(),
            reason: e.to_string(),
        })
    }
}

/// A configured log shipper.
///
/// Owns the credential and the pooled HTTP client. One adapter serves one
/// inbound channel; run several adapters for several channels.
#[derive(Debug)]
pub struct OmsAdapter {
    transformer: Transformer,
    engine: DeliveryEngine<ReqwestClient>,
}

impl OmsAdapter {
    /// Validates `config` and builds the adapter.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError`] if the credential or endpoint is invalid
    /// or the HTTP client cannot be created.
    pub fn new(config: AdapterConfig) -> Result<Self, AdapterError> {
        let credential = Credential::new(&config.workspace_id, &config.shared_key)?;
        let endpoint = config.resolve_endpoint()?;
        let client = ReqwestClient::with_timeouts(config.timeouts).map_err(AdapterError::Client)?;

        tracing::debug!(
            "Shipping to {endpoint} for workspace {}",
            credential.workspace_id()
        );

        let engine = DeliveryEngine::new(client, RequestBuilder::new(credential, endpoint))
            .with_retry_policy(config.retry_policy);
        let transformer = Transformer::new().with_default_log_type(config.default_log_type);

        Ok(Self {
            transformer,
            engine,
        })
    }

    /// Returns the URL requests are sent to.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        self.engine.builder().endpoint()
    }

    /// Ships every message from `messages` until the channel closes.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Unrecoverable`] when a message exhausts its
    /// retry budget.
    pub async fn stream(
        &self,
        mut messages: UnboundedReceiver<LogMessage>,
    ) -> Result<StreamStats, StreamError> {
        consume(&mut messages, &self.transformer, &self.engine).await
    }
}

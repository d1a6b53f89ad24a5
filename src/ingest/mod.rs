//! Authenticated delivery to the Log Analytics HTTP Data Collector API.
//!
//! This module provides:
//! - Shared-key signing ([`Credential`], [`Signer`], [`string_to_sign`])
//! - Endpoint derivation from a workspace id ([`endpoint_for`])
//! - Per-attempt request construction ([`RequestBuilder`])
//! - Linear back-off configuration ([`RetryPolicy`])
//! - Retrying delivery ([`DeliveryEngine`], [`EnvelopeSender`])

mod delivery;
mod endpoint;
mod error;
mod request;
mod retry;
mod signer;


pub use delivery::{DeliveryEngine, EnvelopeSender};
pub use endpoint::{API_VERSION, HOST_SUFFIX, RESOURCE, endpoint_for, workspace_id_from_address};
pub use error::{AttemptError, BuildError, CredentialError, DeliveryError};
pub use request::{CONTENT_TYPE, RequestBuilder, X_MS_DATE, format_ms_date};
pub use retry::RetryPolicy;
pub use signer::{Credential, Signer, sign, string_to_sign};

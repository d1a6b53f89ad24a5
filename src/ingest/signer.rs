//! Shared-key request signing.
//!
//! `Signature = Base64(HMAC-SHA256(Base64Decode(key), UTF8(StringToSign)))`

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::{CredentialError, RESOURCE};

/// Builds the canonical string covered by the signature.
///
/// Five newline-joined fields: method, decimal content length, content
/// type, `x-ms-date:` followed by the date header value, and the resource
/// path. The backend recomputes this byte-for-byte.
///
/// ```
/// use oms_shipper::ingest::string_to_sign;
///
/// let s = string_to_sign(
///     &http::Method::POST,
///     1024,
///     "application/json",
///     "Mon, 04 Apr 2016 08:00:00 GMT",
/// );
/// assert_eq!(
///     s,
///     "POST\n1024\napplication/json\nx-ms-date:Mon, 04 Apr 2016 08:00:00 GMT\n/api/logs"
/// );
/// ```
#[must_use]
pub fn string_to_sign(
    method: &http::Method,
    content_length: usize,
    content_type: &str,
    date: &str,
) -> String {
    format!("{method}\n{content_length}\n{content_type}\nx-ms-date:{date}\n{RESOURCE}")
}

/// Signs `string_to_sign` with a base64-encoded key.
///
/// # Errors
///
/// Returns [`CredentialError`] if the key is empty or not valid base64.
pub fn sign(string_to_sign: &str, key: &str) -> Result<String, CredentialError> {
    Ok(Signer::from_base64(key)?.sign(string_to_sign))
}

/// HMAC-SHA256 signer keyed once with the decoded shared key.
#[derive(Clone)]
pub struct Signer {
    mac: Hmac<Sha256>,
}

impl Signer {
    /// Decodes `key` and prepares the HMAC state.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::MissingKey`] for an empty key and
    /// [`CredentialError::InvalidKey`] for malformed base64.
    pub fn from_base64(key: &str) -> Result<Self, CredentialError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(CredentialError::MissingKey);
        }
        let raw = STANDARD.decode(key)?;
        let mac = Hmac::<Sha256>::new_from_slice(&raw).map_err(|_| CredentialError::KeyLength)?;
        Ok(Self { mac })
    }

    /// Returns the base64-encoded HMAC-SHA256 of `string_to_sign`.
    #[must_use]
    pub fn sign(&self, string_to_sign: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(string_to_sign.as_bytes());
        STANDARD.encode(mac.finalize().into_bytes())
    }
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Signer { .. }")
    }
}

/// Workspace id paired with the signer for its shared key.
///
/// Read-only after construction and owned by a single adapter.
#[derive(Debug, Clone)]
pub struct Credential {
    workspace_id: String,
    signer: Signer,
}

impl Credential {
    /// Validates the workspace id and decodes the shared key.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError`] if either value is missing or malformed.
    pub fn new(workspace_id: &str, shared_key: &str) -> Result<Self, CredentialError> {
        if workspace_id.is_empty() {
            return Err(CredentialError::MissingWorkspace);
        }
        if !workspace_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(CredentialError::InvalidWorkspace(workspace_id.to_string()));
        }

        Ok(Self {
            workspace_id: workspace_id.to_string(),
            signer: Signer::from_base64(shared_key)?,
        })
    }

    /// Returns the workspace id.
    #[must_use]
    pub fn workspace_id(&self) -> &str {
        &self.workspace_id
    }

    /// Returns the `authorization` header value for `string_to_sign`.
    #[must_use]
    pub fn authorization(&self, string_to_sign: &str) -> String {
        format!(
            "SharedKey {}:{}",
            self.workspace_id,
            self.signer.sign(string_to_sign)
        )
    }
}

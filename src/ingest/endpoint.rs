//! Ingestion endpoint addressing.

use url::Url;

/// Resource path covered by the signature.
pub const RESOURCE: &str = "/api/logs";

/// Data Collector API version.
pub const API_VERSION: &str = "2016-04-01";

/// Host suffix appended to the workspace id.
pub const HOST_SUFFIX: &str = "ods.opinsights.azure.com";

/// Returns the Data Collector URL for a workspace.
///
/// # Errors
///
/// Returns the parse error if `workspace_id` does not form a valid host.
pub fn endpoint_for(workspace_id: &str) -> Result<Url, url::ParseError> {
    Url::parse(&format!(
        "https://{workspace_id}.{HOST_SUFFIX}{RESOURCE}?api-version={API_VERSION}"
    ))
}

/// Extracts the workspace id from a route address such as
/// `<workspace-id>.ods.opinsights.azure.com`: its first dot-separated label.
#[must_use]
pub fn workspace_id_from_address(address: &str) -> &str {
    address.split('.').next().unwrap_or_default()
}

//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Workspace and endpoint configuration
    #[serde(default)]
    pub oms: OmsSection,

    /// Container the shipped lines belong to
    #[serde(default)]
    pub container: ContainerSection,

    /// Input configuration
    #[serde(default)]
    pub input: InputSection,

    /// HTTP client configuration
    #[serde(default)]
    pub http: HttpSection,

    /// Retry policy configuration
    #[serde(default)]
    pub retry: RetrySection,
}

/// Workspace and endpoint configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OmsSection {
    /// Route address '<workspace-id>.ods.opinsights.azure.com'
    pub address: Option<String>,

    /// Workspace id (overrides the one derived from `address`)
    pub workspace_id: Option<String>,

    /// Base64 shared key
    pub shared_key: Option<String>,

    /// Endpoint URL override
    pub endpoint: Option<String>,

    /// Default log type
    pub log_type: Option<String>,
}

/// Container descriptor section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContainerSection {
    pub name: Option<String>,
    pub id: Option<String>,
    pub image: Option<String>,
    pub hostname: Option<String>,

    /// Container labels as key-value pairs
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

/// Input configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputSection {
    /// Source tag attached to every line
    pub source: Option<String>,
}

/// HTTP client configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpSection {
    /// Connect timeout in seconds
    pub connect_timeout: Option<u64>,

    /// Overall request timeout in seconds
    pub request_timeout: Option<u64>,
}

/// Retry policy configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetrySection {
    /// Maximum number of delivery attempts
    pub max_attempts: Option<u32>,

    /// Back-off step in seconds
    pub step: Option<u64>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# oms-shipper configuration file

[oms]
# Route address; the workspace id is its first label (required unless workspace_id is set)
# address = "<workspace-id>.ods.opinsights.azure.com"

# Workspace id (overrides the one derived from address)
# workspace_id = "<workspace-id>"

# Base64 shared key (required; may also come from OMS_SHARED_KEY)
# shared_key = "<base64 key>"

# Endpoint override (default: https://<workspace-id>.ods.opinsights.azure.com/api/logs?api-version=2016-04-01)
# endpoint = "https://example.com/api/logs"

# Log type for lines that do not carry a "Type" field (default: Bunyan)
# log_type = "Bunyan"

[container]
# Provenance attached to every line as "dockerinfo"
# name = "web"
# id = "0123456789ab"
# image = "nginx:latest"
# hostname = "web-1"

# [container.labels]
# team = "infra"

[input]
# Source tag: "stdout" ships as INFO, anything else as ERROR (default: stdout)
# source = "stdout"

[http]
# Connect timeout in seconds (default: 5)
# connect_timeout = 5

# Overall request timeout in seconds (default: 10)
# request_timeout = 10

[retry]
# Maximum number of delivery attempts per message (default: 10)
# max_attempts = 10

# Back-off step in seconds; attempt n is followed by n * step (default: 1)
# step = 1
"#
    .to_string()
}

//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use url::Url;

use crate::adapter::AdapterConfig;
use crate::ingest::{RetryPolicy, workspace_id_from_address};
use crate::message::{ContainerInfo, LogType};
use crate::transport::Timeouts;

use super::cli::Cli;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
/// The shared key is only checked for presence here; decoding happens when
/// the adapter is built.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Adapter construction parameters
    pub adapter: AdapterConfig,

    /// Container every line is attributed to
    pub container: ContainerInfo,

    /// Source tag attached to every line
    pub source: String,

    /// Dry-run mode (log envelopes without sending)
    pub dry_run: bool,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let endpoint = self
            .adapter
            .endpoint
            .as_ref()
            .map_or_else(|| "derived".to_string(), ToString::to_string);

        write!(
            f,
            "Config {{ workspace: {}, endpoint: {}, log_type: {}, container: {}, source: {}, \
             timeouts: {}s/{}s, retry: {}x/{}s, dry_run: {} }}",
            self.adapter.workspace_id,
            endpoint,
            self.adapter.default_log_type,
            self.container.name,
            self.source,
            self.adapter.timeouts.connect.as_secs(),
            self.adapter.timeouts.request.as_secs(),
            self.adapter.retry_policy.max_attempts,
            self.adapter.retry_policy.step.as_secs(),
            self.dry_run,
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required fields are missing (workspace id or address, shared key)
    /// - The endpoint URL is invalid
    /// - A duration or the attempt count is zero
    /// - A label is not in `Key=Value` form
    /// - The log type is not a valid header value
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let workspace_id = Self::resolve_workspace_id(cli, toml)?;
        let shared_key = Self::resolve_shared_key(cli, toml)?;
        let endpoint = Self::resolve_endpoint(cli, toml)?;
        let default_log_type = Self::resolve_log_type(cli, toml)?;
        let timeouts = Self::resolve_timeouts(cli, toml)?;
        let retry_policy = Self::build_retry_policy(cli, toml)?;
        let container = Self::build_container(cli, toml)?;

        let source = cli
            .source
            .clone()
            .or_else(|| toml.and_then(|t| t.input.source.clone()))
            .unwrap_or_else(|| defaults::SOURCE.to_string());

        Ok(Self {
            adapter: AdapterConfig {
                workspace_id,
                shared_key,
                endpoint,
                timeouts,
                retry_policy,
                default_log_type,
            },
            container,
            source,
            dry_run: cli.dry_run,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_workspace_id(cli: &Cli, toml: Option<&TomlConfig>) -> Result<String, ConfigError> {
        let oms = toml.map(|t| &t.oms);

        // Each level prefers its explicit id over its address.
        let from_cli = cli.workspace_id.clone().or_else(|| {
            cli.address
                .as_deref()
                .map(|a| workspace_id_from_address(a).to_string())
        });
        let from_toml = || {
            oms.and_then(|o| o.workspace_id.clone()).or_else(|| {
                oms.and_then(|o| o.address.as_deref())
                    .map(|a| workspace_id_from_address(a).to_string())
            })
        };

        from_cli
            .or_else(from_toml)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                ConfigError::missing(
                    field::WORKSPACE_ID,
                    "Use --address or --workspace-id, or set oms.address in config file",
                )
            })
    }

    fn resolve_shared_key(cli: &Cli, toml: Option<&TomlConfig>) -> Result<String, ConfigError> {
        cli.shared_key
            .clone()
            .or_else(|| toml.and_then(|t| t.oms.shared_key.clone()))
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                ConfigError::missing(
                    field::SHARED_KEY,
                    "Use --shared-key, set OMS_SHARED_KEY, or set oms.shared_key in config file",
                )
            })
    }

    fn resolve_endpoint(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Option<Url>, ConfigError> {
        let Some(url_str) = cli
            .endpoint
            .as_deref()
            .or_else(|| toml.and_then(|t| t.oms.endpoint.as_deref()))
        else {
            return Ok(None);
        };

        Url::parse(url_str)
            .map(Some)
            .map_err(|e| ConfigError::InvalidUrl {
                url: url_str.to_string(),
                reason: e.to_string(),
            })
    }

    fn resolve_log_type(cli: &Cli, toml: Option<&TomlConfig>) -> Result<LogType, ConfigError> {
        let Some(value) = cli
            .log_type
            .as_deref()
            .or_else(|| toml.and_then(|t| t.oms.log_type.as_deref()))
        else {
            return Ok(LogType::default());
        };

        LogType::new(value).map_err(|e| ConfigError::InvalidLogType {
            value: value.to_string(),
            reason: e.to_string(),
        })
    }

    fn resolve_timeouts(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Timeouts, ConfigError> {
        let http = toml.map(|t| &t.http);

        let connect = cli
            .connect_timeout
            .or_else(|| http.and_then(|h| h.connect_timeout))
            .unwrap_or(defaults::CONNECT_TIMEOUT_SECS);

        let request = cli
            .request_timeout
            .or_else(|| http.and_then(|h| h.request_timeout))
            .unwrap_or(defaults::REQUEST_TIMEOUT_SECS);

        Ok(Timeouts {
            connect: non_zero_secs("connect_timeout", connect)?,
            request: non_zero_secs("request_timeout", request)?,
        })
    }

    fn build_retry_policy(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<RetryPolicy, ConfigError> {
        let retry = toml.map(|t| &t.retry);

        let max_attempts = cli
            .retry_max
            .or_else(|| retry.and_then(|r| r.max_attempts))
            .unwrap_or(defaults::RETRY_MAX_ATTEMPTS);

        let step_secs = cli
            .retry_step
            .or_else(|| retry.and_then(|r| r.step))
            .unwrap_or(defaults::RETRY_STEP_SECS);

        if max_attempts == 0 {
            return Err(ConfigError::InvalidRetry(
                "max_attempts must be greater than 0".to_string(),
            ));
        }

        if step_secs == 0 {
            return Err(ConfigError::InvalidRetry(
                "step must be greater than 0".to_string(),
            ));
        }

        Ok(RetryPolicy::new()
            .with_max_attempts(max_attempts)
            .with_step(Duration::from_secs(step_secs)))
    }

    fn build_container(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<ContainerInfo, ConfigError> {
        let section = toml.map(|t| &t.container);

        // TOML labels first (CLI can override)
        let mut labels: BTreeMap<String, String> =
            section.map(|s| s.labels.clone()).unwrap_or_default();
        for label in &cli.labels {
            let (key, value) = parse_label(label)?;
            labels.insert(key, value);
        }

        Ok(ContainerInfo {
            name: merge(cli.container_name.as_ref(), section.and_then(|s| s.name.as_ref())),
            id: merge(cli.container_id.as_ref(), section.and_then(|s| s.id.as_ref())),
            image: merge(cli.image.as_ref(), section.and_then(|s| s.image.as_ref())),
            hostname: merge(cli.hostname.as_ref(), section.and_then(|s| s.hostname.as_ref())),
            labels,
        })
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

// Helper functions

fn merge(cli: Option<&String>, toml: Option<&String>) -> String {
    cli.or(toml).cloned().unwrap_or_default()
}

fn non_zero_secs(field: &'static str, secs: u64) -> Result<Duration, ConfigError> {
    if secs == 0 {
        return Err(ConfigError::InvalidDuration {
            field,
            reason: "must be greater than 0".to_string(),
        });
    }
    Ok(Duration::from_secs(secs))
}

fn parse_label(s: &str) -> Result<(String, String), ConfigError> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(ConfigError::InvalidLabel {
            value: s.to_string(),
        }),
    }
}

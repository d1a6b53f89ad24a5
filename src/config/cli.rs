//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// OMS shipper: container logs to Azure Log Analytics
///
/// Reads log lines from stdin and ships them, signed with the workspace
/// shared key, to the HTTP Data Collector API.
#[derive(Debug, Parser)]
#[command(name = "oms-shipper")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Route address '<workspace-id>.ods.opinsights.azure.com'
    #[arg(long)]
    pub address: Option<String>,

    /// Workspace id (overrides the one derived from --address)
    #[arg(long = "workspace-id")]
    pub workspace_id: Option<String>,

    /// Base64 shared key of the workspace
    #[arg(long = "shared-key", env = "OMS_SHARED_KEY", hide_env_values = true)]
    pub shared_key: Option<String>,

    /// Endpoint URL override (default derived from the workspace id)
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Log type for lines that do not carry a 'Type' field
    #[arg(long = "log-type")]
    pub log_type: Option<String>,

    /// Source tag attached to every line ('stdout' ships as INFO, anything else as ERROR)
    #[arg(long)]
    pub source: Option<String>,

    /// Container name
    #[arg(long = "container-name")]
    pub container_name: Option<String>,

    /// Container id
    #[arg(long = "container-id")]
    pub container_id: Option<String>,

    /// Container image reference
    #[arg(long)]
    pub image: Option<String>,

    /// Container hostname
    #[arg(long)]
    pub hostname: Option<String>,

    /// Container label in 'Key=Value' format (can be specified multiple times)
    #[arg(long = "label", value_name = "K=V")]
    pub labels: Vec<String>,

    /// Connect timeout in seconds
    #[arg(long = "connect-timeout")]
    pub connect_timeout: Option<u64>,

    /// Overall request timeout in seconds
    #[arg(long = "request-timeout")]
    pub request_timeout: Option<u64>,

    /// Maximum number of delivery attempts per message
    #[arg(long = "retry-max")]
    pub retry_max: Option<u32>,

    /// Back-off step in seconds (wait n * step after attempt n)
    #[arg(long = "retry-step")]
    pub retry_step: Option<u64>,

    /// Path to configuration file
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Test mode - log envelopes without sending them
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging
    #[arg(long, short)]
    pub verbose: bool,
}

/// Subcommands for oms-shipper
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = "oms-shipper.toml")]
        output: PathBuf,
    },
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Some(Command::Init { .. }))
    }
}

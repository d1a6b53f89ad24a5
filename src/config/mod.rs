//! Configuration layer for the `oms-shipper` binary.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** (the shared key may also come from `OMS_SHARED_KEY`)
//! 2. **TOML config file**
//! 3. **Built-in defaults**
//!
//! The workspace id is taken from `workspace_id` if given, otherwise from the
//! first label of `address`. An explicit id at a lower level still loses to an
//! address at a higher level.
//!
//! Container labels from the CLI are merged over the TOML labels; a CLI label
//! replaces a TOML label with the same key.
//!
//! # Boolean Flag Semantics
//!
//! `--dry-run` and `--verbose` are CLI-only and only enable.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;

#[cfg(test)]
mod validated_tests;

pub use cli::{Cli, Command};
pub use error::{ConfigError, field};
pub use toml::{TomlConfig, default_config_template};
pub use validated::{ValidatedConfig, write_default_config};

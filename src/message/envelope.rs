//! Inbound log messages and the JSON shapes sent for them.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use http::HeaderValue;
use serde::Serialize;

use super::TransformError;

/// Container that produced a log line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerInfo {
    /// Container name
    pub name: String,
    /// Container identifier
    pub id: String,
    /// Image reference the container runs
    pub image: String,
    /// Hostname configured inside the container
    pub hostname: String,
    /// Container labels
    pub labels: BTreeMap<String, String>,
}

/// One line of output from a monitored container.
///
/// The container descriptor is shared between all lines of the same
/// container.
#[derive(Debug, Clone)]
pub struct LogMessage {
    /// Raw text of the line
    pub data: String,
    /// Stream the line came from, e.g. `stdout` or `stderr`
    pub source: String,
    /// Container the line belongs to
    pub container: Arc<ContainerInfo>,
}

impl LogMessage {
    /// Creates a message for the given container.
    #[must_use]
    pub fn new(
        data: impl Into<String>,
        source: impl Into<String>,
        container: Arc<ContainerInfo>,
    ) -> Self {
        Self {
            data: data.into(),
            source: source.into(),
            container,
        }
    }
}

/// Provenance attached to every outbound payload as `dockerinfo`.
#[derive(Debug, Serialize)]
pub struct DockerInfo<'a> {
    pub name: &'a str,
    pub id: &'a str,
    pub image: &'a str,
    pub hostname: &'a str,
    pub labels: &'a BTreeMap<String, String>,
}

impl<'a> From<&'a ContainerInfo> for DockerInfo<'a> {
    fn from(container: &'a ContainerInfo) -> Self {
        Self {
            name: &container.name,
            id: &container.id,
            image: &container.image,
            hostname: &container.hostname,
            labels: &container.labels,
        }
    }
}

/// Bunyan severity derived from the source stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Lines written to stdout
    Info,
    /// Lines written to any other stream
    Error,
}

impl Level {
    /// Maps a source tag to a level: `stdout` is informational, anything else an error.
    #[must_use]
    pub fn from_source(source: &str) -> Self {
        if source == "stdout" {
            Self::Info
        } else {
            Self::Error
        }
    }

    /// Numeric Bunyan level.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Info => 30,
            Self::Error => 50,
        }
    }

    /// Upper-case level name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Error => "ERROR",
        }
    }
}

/// Structured record synthesized for a line that is not a JSON object.
#[derive(Debug, Serialize)]
pub struct BunyanRecord<'a> {
    pub v: u8,
    pub level: u8,
    #[serde(rename = "levelStr")]
    pub level_str: &'static str,
    pub name: &'a str,
    pub hostname: &'a str,
    pub pid: &'a str,
    pub time: String,
    pub msg: &'a str,
    pub src: &'a str,
    pub dockerinfo: DockerInfo<'a>,
}

/// Backend routing label sent as the `Log-Type` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogType(HeaderValue);

impl LogType {
    /// Tag used when a payload does not name its own type.
    pub const DEFAULT: &'static str = "Bunyan";

    /// Validates `value` as a header value.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::InvalidLogType`] if `value` contains
    /// characters not allowed in an HTTP header.
    pub fn new(value: &str) -> Result<Self, TransformError> {
        HeaderValue::from_str(value)
            .map(Self)
            .map_err(|source| TransformError::InvalidLogType {
                value: value.to_string(),
                source,
            })
    }

    /// The header value to send.
    #[must_use]
    pub const fn header_value(&self) -> &HeaderValue {
        &self.0
    }
}

impl Default for LogType {
    fn default() -> Self {
        Self(HeaderValue::from_static(Self::DEFAULT))
    }
}

impl fmt::Display for LogType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.0.as_bytes()))
    }
}

/// A serialized JSON object ready to be signed and sent.
///
/// The body is always a JSON object carrying a `dockerinfo` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Value for the `Log-Type` header
    pub log_type: LogType,
    /// UTF-8 JSON body
    pub body: Vec<u8>,
}

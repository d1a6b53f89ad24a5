//! Log messages and their conversion into outbound JSON envelopes.
//!
//! This module provides:
//! - The inbound data model ([`LogMessage`], [`ContainerInfo`])
//! - The outbound JSON shapes ([`DockerInfo`], [`BunyanRecord`], [`Level`])
//! - The converted result ready for signing ([`Envelope`], [`LogType`])
//! - The conversion itself ([`Transformer`])

mod envelope;
mod error;
mod transform;


pub use envelope::{BunyanRecord, ContainerInfo, DockerInfo, Envelope, Level, LogMessage, LogType};
pub use error::TransformError;
pub use transform::Transformer;

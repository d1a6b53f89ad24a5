//! Conversion of raw log lines into JSON envelopes.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::time::{Clock, SystemClock};

use super::{
    BunyanRecord, ContainerInfo, DockerInfo, Envelope, Level, LogMessage, LogType, TransformError,
};

/// Key under which container provenance is injected.
const DOCKERINFO: &str = "dockerinfo";

/// Key a structured payload may use to name its own log type.
const TYPE_FIELD: &str = "Type";

/// `time` format of synthesized records: ISO-8601 UTC with milliseconds.
const RECORD_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Turns [`LogMessage`]s into [`Envelope`]s.
///
/// A payload that parses as a JSON object is forwarded as-is with a
/// `dockerinfo` field added. Anything else is wrapped in a
/// [`BunyanRecord`].
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use oms_shipper::message::{ContainerInfo, LogMessage, Transformer};
///
/// let container = Arc::new(ContainerInfo {
///     name: "web".into(),
///     ..ContainerInfo::default()
/// });
/// let envelope = Transformer::new()
///     .transform(&LogMessage::new("boot ok", "stdout", container))
///     .unwrap();
/// assert_eq!(envelope.log_type.to_string(), "Bunyan");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Transformer<C = SystemClock> {
    clock: C,
    default_log_type: LogType,
}

impl Transformer<SystemClock> {
    /// Creates a transformer stamping records with the system time.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C> Transformer<C> {
    /// Sets the clock used to stamp synthesized records.
    #[must_use]
    pub fn with_clock<C2>(self, clock: C2) -> Transformer<C2> {
        Transformer {
            clock,
            default_log_type: self.default_log_type,
        }
    }

    /// Sets the log type used when a payload does not carry one.
    #[must_use]
    pub fn with_default_log_type(mut self, log_type: LogType) -> Self {
        self.default_log_type = log_type;
        self
    }
}

impl<C: Clock> Transformer<C> {
    /// Converts one message into an envelope.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError`] if the envelope cannot be serialized or
    /// the payload names a log type that is not a valid header value.
    pub fn transform(&self, message: &LogMessage) -> Result<Envelope, TransformError> {
        match serde_json::from_str::<Value>(&message.data) {
            Ok(Value::Object(fields)) => self.forward(fields, &message.container),
            _ => self.synthesize(message),
        }
    }

    fn forward(
        &self,
        mut fields: Map<String, Value>,
        container: &ContainerInfo,
    ) -> Result<Envelope, TransformError> {
        let log_type = match fields.get(TYPE_FIELD).and_then(Value::as_str) {
            Some(name) => LogType::new(name)?,
            None => self.default_log_type.clone(),
        };

        fields.insert(
            DOCKERINFO.to_string(),
            serde_json::to_value(DockerInfo::from(container))?,
        );
        let body = serde_json::to_vec(&fields)?;

        Ok(Envelope { log_type, body })
    }

    fn synthesize(&self, message: &LogMessage) -> Result<Envelope, TransformError> {
        let container = &*message.container;
        let level = Level::from_source(&message.source);
        let time = DateTime::<Utc>::from(self.clock.now())
            .format(RECORD_TIME_FORMAT)
            .to_string();

        let record = BunyanRecord {
            v: 0,
            level: level.code(),
            level_str: level.as_str(),
            name: &container.name,
            hostname: &container.hostname,
            pid: &container.id,
            time,
            msg: &message.data,
            src: &container.image,
            dockerinfo: DockerInfo::from(container),
        };

        Ok(Envelope {
            log_type: self.default_log_type.clone(),
            body: serde_json::to_vec(&record)?,
        })
    }
}

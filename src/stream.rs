//! Sequential consumption of the inbound message channel.
//!
//! One message is transformed and delivered at a time, so the order of
//! requests on the wire matches the order of arrival on the channel.

use thiserror::Error;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::ingest::{DeliveryError, EnvelopeSender};
use crate::message::{LogMessage, Transformer};
use crate::time::Clock;

#[cfg(test)]
#[path = "stream_tests.rs"]
mod tests;

/// Error that stops the consumer.
#[derive(Debug, Error)]
pub enum StreamError {
    /// A message could not be delivered within the retry budget.
    ///
    /// The adapter has no durable queue, so the caller should treat this as
    /// fatal and let a supervisor restart the process.
    #[error("Unrecoverable delivery failure: {0}")]
    Unrecoverable(#[source] DeliveryError),
}

/// Counters for a finished stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    /// Messages accepted by the backend
    pub delivered: u64,
    /// Messages dropped because their content could not be shipped
    pub dropped: u64,
}

/// Drains `messages` until the channel closes.
///
/// Each message is transformed and handed to `sender`; the next message
/// is not received until the previous delivery has finished. Content
/// errors are logged and the message is dropped.
///
/// # Errors
///
/// Returns [`StreamError::Unrecoverable`] as soon as a delivery exhausts
/// its attempts. Messages still queued in the channel are not consumed.
pub async fn consume<C, D>(
    messages: &mut UnboundedReceiver<LogMessage>,
    transformer: &Transformer<C>,
    sender: &D,
) -> Result<StreamStats, StreamError>
where
    C: Clock,
    D: EnvelopeSender,
{
    let mut stats = StreamStats::default();

    while let Some(message) = messages.recv().await {
        let envelope = match transformer.transform(&message) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::error!(
                    "Dropping message from container {}: {e}",
                    message.container.name
                );
                stats.dropped += 1;
                continue;
            }
        };

        match sender.send(&envelope).await {
            Ok(()) => stats.delivered += 1,
            Err(e) if e.is_unrecoverable() => {
                tracing::error!("Unable to send message, stopping: {e}");
                return Err(StreamError::Unrecoverable(e));
            }
            Err(e) => {
                tracing::error!(
                    "Dropping message from container {}: {e}",
                    message.container.name
                );
                stats.dropped += 1;
            }
        }
    }

    tracing::debug!(
        "Log stream closed ({} delivered, {} dropped)",
        stats.delivered,
        stats.dropped
    );
    Ok(stats)
}

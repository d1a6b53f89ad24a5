//! Application execution logic.
//!
//! Reads log lines from stdin, forwards them over a channel, and ships them
//! with the adapter until stdin closes or a shutdown signal arrives.

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::LinesStream;

use oms_shipper::adapter::{AdapterConfig, AdapterError, OmsAdapter};
use oms_shipper::config::ValidatedConfig;
use oms_shipper::ingest::{Credential, DeliveryError, EnvelopeSender, RequestBuilder};
use oms_shipper::message::{ContainerInfo, Envelope, LogMessage, Transformer};
use oms_shipper::stream::{StreamError, StreamStats, consume};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// The adapter could not be built from the configuration.
    #[error("Failed to create adapter: {0}")]
    Adapter(#[from] AdapterError),

    /// A message could not be delivered.
    #[error(transparent)]
    Stream(#[from] StreamError),

    /// Reading log lines from the input failed.
    #[error("Failed to read input: {0}")]
    Input(#[source] std::io::Error),
}

/// Logs each envelope instead of sending it.
///
/// The request is still built and signed, so credential and header
/// problems show up the same way they would in a real run.
#[derive(Debug)]
pub struct DryRunSender {
    builder: RequestBuilder,
}

impl DryRunSender {
    /// Creates a dry-run sender for the configured workspace.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError`] if the credential or endpoint is invalid.
    pub fn new(config: &AdapterConfig) -> Result<Self, AdapterError> {
        let credential = Credential::new(&config.workspace_id, &config.shared_key)?;
        let endpoint = config.resolve_endpoint()?;

        Ok(Self {
            builder: RequestBuilder::new(credential, endpoint),
        })
    }
}

impl EnvelopeSender for DryRunSender {
    async fn send(&self, envelope: &Envelope) -> Result<(), DeliveryError> {
        let request = self.builder.build(&envelope.log_type, &envelope.body)?;

        tracing::info!(
            "Dry-run: would {} {} (Log-Type: {}, {} bytes)",
            request.method,
            request.url,
            envelope.log_type,
            request.content_length()
        );
        tracing::debug!("Dry-run body: {}", String::from_utf8_lossy(&request.body));
        Ok(())
    }
}

/// Executes the shipper until input ends.
///
/// # Errors
///
/// Returns an error if:
/// - The adapter cannot be built
/// - A message exhausts its retry budget
/// - Reading stdin fails
///
/// # Coverage Note
///
/// This function is excluded from coverage because it reads the process's
/// stdin and installs signal handlers.
#[cfg(not(tarpaulin_include))]
pub async fn execute(config: ValidatedConfig) -> Result<StreamStats, RunError> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let container = Arc::new(config.container);
    let reader = forward_lines(
        BufReader::new(tokio::io::stdin()),
        tx,
        container,
        &config.source,
        shutdown_signal(),
    );

    if config.dry_run {
        tracing::info!("Dry-run mode enabled - envelopes will be logged but not sent");
        let sender = DryRunSender::new(&config.adapter)?;
        let transformer =
            Transformer::new().with_default_log_type(config.adapter.default_log_type.clone());
        run_pipeline(reader, consume(&mut rx, &transformer, &sender)).await
    } else {
        let adapter = OmsAdapter::new(config.adapter)?;
        tracing::info!("Shipping to {}", adapter.endpoint());
        run_pipeline(reader, adapter.stream(rx)).await
    }
}

/// Drives the line reader and the consumer together.
///
/// A delivery failure stops the run immediately. Otherwise the consumer
/// drains whatever the reader queued before it stopped.
async fn run_pipeline<R, S>(reader: R, consumer: S) -> Result<StreamStats, RunError>
where
    R: Future<Output = Result<u64, std::io::Error>>,
    S: Future<Output = Result<StreamStats, StreamError>>,
{
    tokio::pin!(reader);
    tokio::pin!(consumer);

    let read = tokio::select! {
        stats = &mut consumer => return stats.map_err(RunError::from),
        read = &mut reader => read,
    };

    let stats = consumer.await?;
    let lines = read.map_err(RunError::Input)?;

    tracing::info!(
        "Input closed after {lines} line(s): {} delivered, {} dropped",
        stats.delivered,
        stats.dropped
    );
    Ok(stats)
}

/// Sends every non-empty line of `reader` as a [`LogMessage`].
///
/// Stops at end of input, when `shutdown` completes, or when the receiving
/// side has gone away. Dropping `tx` on return closes the channel.
///
/// # Errors
///
/// Returns the I/O error that interrupted reading. Lines sent before the
/// error stay queued.
pub async fn forward_lines<R, F>(
    reader: R,
    tx: UnboundedSender<LogMessage>,
    container: Arc<ContainerInfo>,
    source: &str,
    shutdown: F,
) -> Result<u64, std::io::Error>
where
    R: AsyncBufRead + Unpin,
    F: Future<Output = ()>,
{
    let mut lines = LinesStream::new(reader.lines());
    tokio::pin!(shutdown);
    let mut forwarded = 0;

    loop {
        tokio::select! {
            biased;

            () = &mut shutdown => {
                tracing::info!("Shutdown signal received, stopping...");
                break;
            }

            line = lines.next() => {
                let line = match line {
                    Some(line) => line?,
                    None => break,
                };
                if line.trim().is_empty() {
                    continue;
                }
                let message = LogMessage::new(line, source, Arc::clone(&container));
                if tx.send(message).is_err() {
                    tracing::debug!("Consumer stopped, no longer reading input");
                    break;
                }
                forwarded += 1;
            }
        }
    }

    Ok(forwarded)
}

/// Returns a future that completes when a shutdown signal is received.
///
/// A handler that cannot be installed is logged and never fires.
///
/// Excluded from coverage - requires OS signal handling.
#[cfg(not(tarpaulin_include))]
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}

//! Delivery of envelopes with retry and back-off.

use crate::message::Envelope;
use crate::time::{Clock, Sleeper, SystemClock, TokioSleeper};
use crate::transport::{HttpClient, HttpResponse};

use super::{AttemptError, DeliveryError, RequestBuilder, RetryPolicy};

/// Trait for shipping one envelope to the backend.
///
/// Lets the stream consumer be driven by something other than the real
/// engine (a dry run, or a mock in tests).
///
/// # Implementation Notes
///
/// Implementations should handle retries internally, returning
/// [`DeliveryError::Exhausted`] when all attempts fail.
pub trait EnvelopeSender: Send + Sync {
    /// Delivers `envelope`, returning once it is accepted or abandoned.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError`] if the envelope could not be delivered.
    fn send(
        &self,
        envelope: &Envelope,
    ) -> impl std::future::Future<Output = Result<(), DeliveryError>> + Send;
}

/// Retrying sender for the Data Collector API.
///
/// Each attempt rebuilds the request so the timestamp and signature are
/// current. Transport failures and every status other than 200/202 are
/// retried alike, waiting `n * step` after attempt `n`. After the last
/// attempt fails the engine gives up with [`DeliveryError::Exhausted`].
///
/// # Type Parameters
///
/// - `H`: The HTTP client implementation
/// - `S`: The sleeper for back-off delays (defaults to [`TokioSleeper`])
/// - `C`: The clock used to date requests (defaults to [`SystemClock`])
#[derive(Debug)]
pub struct DeliveryEngine<H, S = TokioSleeper, C = SystemClock> {
    client: H,
    sleeper: S,
    builder: RequestBuilder<C>,
    retry_policy: RetryPolicy,
}

impl<H, C> DeliveryEngine<H, TokioSleeper, C> {
    /// Creates an engine with the default retry policy and [`TokioSleeper`].
    #[must_use]
    pub fn new(client: H, builder: RequestBuilder<C>) -> Self {
        Self {
            client,
            sleeper: TokioSleeper,
            builder,
            retry_policy: RetryPolicy::default(),
        }
    }
}

impl<H, S, C> DeliveryEngine<H, S, C> {
    /// Sets a custom sleeper for back-off delays.
    ///
    /// This is primarily useful for testing to avoid actual delays.
    #[must_use]
    pub fn with_sleeper<S2>(self, sleeper: S2) -> DeliveryEngine<H, S2, C> {
        DeliveryEngine {
            client: self.client,
            sleeper,
            builder: self.builder,
            retry_policy: self.retry_policy,
        }
    }

    /// Sets the retry policy.
    #[must_use]
    pub const fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Returns the configured retry policy.
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Returns the request builder.
    #[must_use]
    pub const fn builder(&self) -> &RequestBuilder<C> {
        &self.builder
    }
}

impl<H: HttpClient, S: Sleeper, C: Clock> DeliveryEngine<H, S, C> {
    /// Executes a single attempt with a freshly built request.
    async fn attempt(&self, envelope: &Envelope) -> Result<Result<(), AttemptError>, DeliveryError> {
        let request = self.builder.build(&envelope.log_type, &envelope.body)?;

        let outcome = match self.client.request(request).await {
            Ok(response) if response.is_accepted() => Ok(()),
            Ok(response) => Err(rejected(&response)),
            Err(e) => {
                tracing::warn!("Ingestion request failed: {e}");
                Err(AttemptError::Http(e))
            }
        };
        Ok(outcome)
    }

    async fn send_with_retry(&self, envelope: &Envelope) -> Result<(), DeliveryError> {
        let mut attempt = 1;

        loop {
            let last_error = match self.attempt(envelope).await? {
                Ok(()) => {
                    tracing::debug!(
                        "Delivered {} bytes as {} on attempt {attempt}",
                        envelope.body.len(),
                        envelope.log_type,
                    );
                    return Ok(());
                }
                Err(e) => e,
            };

            if !self.retry_policy.should_retry(attempt) {
                tracing::error!("Unable to deliver message after {attempt} attempts, giving up");
                return Err(DeliveryError::Exhausted {
                    attempts: attempt,
                    last_error,
                });
            }

            let delay = self.retry_policy.delay_after(attempt);
            tracing::info!(
                "Back-off of {}s before retry {} of {}",
                delay.as_secs_f64(),
                attempt + 1,
                self.retry_policy.max_attempts,
            );
            self.sleeper.sleep(delay).await;
            attempt += 1;
        }
    }
}

fn rejected(response: &HttpResponse) -> AttemptError {
    tracing::warn!("Ingestion endpoint returned status {}", response.status);
    tracing::warn!("Response: {}", response.dump());
    AttemptError::Status {
        status: response.status,
        body: response.body_text().map(ToString::to_string),
    }
}

impl<H: HttpClient, S: Sleeper, C: Clock> EnvelopeSender for DeliveryEngine<H, S, C> {
    async fn send(&self, envelope: &Envelope) -> Result<(), DeliveryError> {
        self.send_with_retry(envelope).await
    }
}

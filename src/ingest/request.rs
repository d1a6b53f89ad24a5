//! Construction of signed ingestion requests.

use std::time::SystemTime;

use chrono::{DateTime, Utc};
use http::header::{AUTHORIZATION, HeaderName, HeaderValue};
use url::Url;

use crate::message::LogType;
use crate::time::{Clock, SystemClock};
use crate::transport::HttpRequest;

use super::{BuildError, Credential, string_to_sign};

/// Content type of every request body.
pub const CONTENT_TYPE: &str = "application/json";

/// Name of the request timestamp header. Lower case on the wire.
pub const X_MS_DATE: &str = "x-ms-date";

const LOG_TYPE: &str = "log-type";

/// Renders `time` the way the backend expects in `x-ms-date`.
///
/// RFC 1123 in UTC with the literal zone `GMT`, always in English.
///
/// ```
/// use std::time::{Duration, SystemTime};
/// use oms_shipper::ingest::format_ms_date;
///
/// let t = SystemTime::UNIX_EPOCH + Duration::from_secs(1_459_756_800);
/// assert_eq!(format_ms_date(t), "Mon, 04 Apr 2016 08:00:00 GMT");
/// ```
#[must_use]
pub fn format_ms_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

/// Builds a freshly dated and signed request for each delivery attempt.
///
/// The endpoint and credential are fixed for the builder's lifetime;
/// only the timestamp and signature change between calls.
#[derive(Debug, Clone)]
pub struct RequestBuilder<C = SystemClock> {
    credential: Credential,
    endpoint: Url,
    clock: C,
}

impl RequestBuilder<SystemClock> {
    /// Creates a builder dating requests with the system clock.
    #[must_use]
    pub const fn new(credential: Credential, endpoint: Url) -> Self {
        Self {
            credential,
            endpoint,
            clock: SystemClock,
        }
    }
}

impl<C> RequestBuilder<C> {
    /// Sets the clock used for the `x-ms-date` header.
    #[must_use]
    pub fn with_clock<C2>(self, clock: C2) -> RequestBuilder<C2> {
        RequestBuilder {
            credential: self.credential,
            endpoint: self.endpoint,
            clock,
        }
    }

    /// Returns the target URL.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Returns the credential used for signing.
    #[must_use]
    pub const fn credential(&self) -> &Credential {
        &self.credential
    }
}

impl<C: Clock> RequestBuilder<C> {
    /// Builds a POST of `body` tagged with `log_type`, dated now and signed.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] if a header value cannot be formed.
    pub fn build(&self, log_type: &LogType, body: &[u8]) -> Result<HttpRequest, BuildError> {
        let date = format_ms_date(self.clock.now());
        let request = HttpRequest::post(self.endpoint.clone()).with_body(body.to_vec());

        let authorization = self.credential.authorization(&string_to_sign(
            &request.method,
            request.content_length(),
            CONTENT_TYPE,
            &date,
        ));

        Ok(request
            .with_header(
                HeaderName::from_static(LOG_TYPE),
                log_type.header_value().clone(),
            )
            .with_header(
                http::header::CONTENT_TYPE,
                HeaderValue::from_static(CONTENT_TYPE),
            )
            .with_header(HeaderName::from_static(X_MS_DATE), header(X_MS_DATE, &date)?)
            .with_header(AUTHORIZATION, header("authorization", &authorization)?))
    }
}

fn header(name: &'static str, value: &str) -> Result<HeaderValue, BuildError> {
    HeaderValue::from_str(value).map_err(|source| BuildError { name, source })
}

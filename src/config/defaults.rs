//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

/// Default source tag for lines read from stdin.
pub const SOURCE: &str = "stdout";

/// Default connect timeout in seconds.
pub const CONNECT_TIMEOUT_SECS: u64 = 5;

/// Default overall request timeout in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Default maximum number of delivery attempts per message.
pub const RETRY_MAX_ATTEMPTS: u32 = 10;

/// Default back-off step in seconds.
pub const RETRY_STEP_SECS: u64 = 1;

//! Constants for the download module (timeouts, concurrency bounds).

/// Default whole-request timeout for page fetches and file downloads (30 seconds).
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default time in-flight downloads get to finish after a shutdown request (10 seconds).
pub const DEFAULT_SHUTDOWN_GRACE_SECS: u64 = 10;

/// Minimum allowed concurrency value.
pub const MIN_CONCURRENCY: usize = 1;

/// Maximum allowed concurrency value.
pub const MAX_CONCURRENCY: usize = 100;

/// Default concurrency if not specified.
pub const DEFAULT_CONCURRENCY: usize = 10;

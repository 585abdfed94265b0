//! API clients for the streaming backend
//!
//! - Catalog: season and episode metadata
//! - Progress: per-user playback resumption records
//!
//! Both clients share one injected `reqwest::Client` built with a bounded
//! request timeout; each feature constructing its own client is a pattern
//! this crate deliberately avoids.

use std::time::Duration;

pub mod catalog;
pub mod progress;

pub use catalog::CatalogClient;
pub use progress::ProgressClient;

/// Default request timeout, within the recommended 5-10s band
pub const DEFAULT_TIMEOUT_SECS: u64 = 8;

/// Build the shared HTTP client with a bounded per-request timeout.
///
/// Timeouts surface as transport errors; retry policy belongs to the host
/// application, not this crate.
pub fn build_http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_default()
}

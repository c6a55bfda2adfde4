//! Directus request metrics.

use metrics::{counter, histogram};

/// Metric name constants for consistency.
pub mod names {
    /// Total Directus requests by operation and status.
    pub const REQUESTS_TOTAL: &str = "directus_requests_total";

    /// Request latency in seconds by operation.
    pub const LATENCY_SECONDS: &str = "directus_latency_seconds";

    /// Cache hits/misses by key.
    pub const CACHE_LOOKUPS_TOTAL: &str = "directus_cache_lookups_total";
}

/// Record metrics for a completed Directus request.
pub fn record_request(operation: &str, status: u16, latency_ms: f64) {
    counter!(
        names::REQUESTS_TOTAL,
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        names::LATENCY_SECONDS,
        "operation" => operation.to_string()
    )
    .record(latency_ms / 1000.0);
}

/// Record a cache lookup outcome.
pub fn record_cache_lookup(key: &str, hit: bool) {
    counter!(
        names::CACHE_LOOKUPS_TOTAL,
        "key" => key.to_string(),
        "outcome" => if hit { "hit" } else { "miss" }
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names() {
        assert!(names::REQUESTS_TOTAL.contains("requests"));
        assert!(names::LATENCY_SECONDS.contains("latency"));
        assert!(names::CACHE_LOOKUPS_TOTAL.contains("cache"));
    }
}

//! # Request Metrics
//!
//! Metrics for the list route: requests by outcome, list call latency and result size.

use super::registry::register;
use anyhow::Result;
use prometheus::{Histogram, IntCounterVec, IntGauge};
use std::sync::LazyLock;

static REQUESTS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "secret_lister_requests_total",
            "Total number of list requests by outcome",
        ),
        &["outcome"],
    )
    .expect("Failed to create REQUESTS_TOTAL metric - this should never happen")
});

static LIST_DURATION: LazyLock<Histogram> = LazyLock::new(|| {
    Histogram::with_opts(
        prometheus::HistogramOpts::new(
            "secret_lister_list_duration_seconds",
            "Duration of the list call against the API server in seconds",
        )
        .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
    )
    .expect("Failed to create LIST_DURATION metric - this should never happen")
});

static SECRETS_RETURNED: LazyLock<IntGauge> = LazyLock::new(|| {
    IntGauge::new(
        "secret_lister_secrets_returned",
        "Number of secret names returned by the last successful list",
    )
    .expect("Failed to create SECRETS_RETURNED metric - this should never happen")
});

/// Register request metrics with the registry
pub(crate) fn register_request_metrics() -> Result<()> {
    register(Box::new(REQUESTS_TOTAL.clone()))?;
    register(Box::new(LIST_DURATION.clone()))?;
    register(Box::new(SECRETS_RETURNED.clone()))?;
    Ok(())
}

/// Count one request; `outcome` is `success` or a list error reason
pub fn increment_requests(outcome: &str) {
    REQUESTS_TOTAL.with_label_values(&[outcome]).inc();
}

pub fn observe_list_duration(duration: f64) {
    LIST_DURATION.observe(duration);
}

pub fn set_secrets_returned(count: usize) {
    SECRETS_RETURNED.set(i64::try_from(count).unwrap_or(i64::MAX));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_requests_by_outcome() {
        let before = REQUESTS_TOTAL.with_label_values(&["forbidden"]).get();
        increment_requests("forbidden");
        let after = REQUESTS_TOTAL.with_label_values(&["forbidden"]).get();
        assert_eq!(after, before + 1u64);
    }

    #[test]
    fn test_observe_list_duration() {
        let before = LIST_DURATION.get_sample_count();
        observe_list_duration(0.2);
        assert!(LIST_DURATION.get_sample_count() > before);
    }

    #[test]
    fn test_register_twice_is_ok() {
        register_request_metrics().unwrap();
        register_request_metrics().unwrap();
    }

    #[test]
    fn test_gathered_output_names_metrics() {
        register_request_metrics().unwrap();
        increment_requests("success");
        let text = super::super::gather_metrics().unwrap();
        assert!(text.contains("secret_lister_requests_total"));
    }
}

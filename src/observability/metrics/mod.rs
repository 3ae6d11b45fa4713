//! # Metrics Module
//!
//! Prometheus metrics for monitoring the service, organized by responsibility.
//!
//! ## Sub-modules
//!
//! - `registry` - Metrics registry setup, registration and text exposition
//! - `request_metrics` - List route metrics (requests by outcome, list latency, result size)

pub mod registry;
pub mod request_metrics;

pub use registry::*;
pub use request_metrics::*;

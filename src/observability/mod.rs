//! # Observability
//!
//! Prometheus metrics for the list route. Logging is plain `tracing`, set up in
//! [`crate::runtime::initialization`].

pub mod metrics;

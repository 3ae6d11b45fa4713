//! # Service Configuration
//!
//! Service-level configuration loaded from environment variables.
//!
//! All configuration has sensible defaults and can be overridden via environment variables
//! (populated from a ConfigMap with `envFrom` in the deployment) or via command-line flags
//! on the binary. The listening port is fixed and deliberately absent from this module.

mod service;

pub use service::ServiceConfig;

/// Load configuration from the process environment with defaults
pub fn load_config() -> ServiceConfig {
    ServiceConfig::from_env()
}

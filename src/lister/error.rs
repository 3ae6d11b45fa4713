//! # List Operation Error Types
//!
//! Per-request failures of the list call, classified so the HTTP layer can answer with
//! a distinct status instead of an empty success.

use std::time::Duration;
use thiserror::Error;

/// List operation error with classification
#[derive(Debug, Error)]
pub enum ListOperationError {
    /// RBAC denies the `list` verb on secrets in the namespace
    #[error("listing secrets in namespace {namespace} is forbidden: {message}")]
    Forbidden { namespace: String, message: String },
    /// The API server rejected the credential itself
    #[error("API server rejected the credential: {message}")]
    Unauthorized { message: String },
    /// The list call did not complete within the configured bound
    #[error("listing secrets in namespace {namespace} timed out after {}s", .after.as_secs())]
    Timeout { namespace: String, after: Duration },
    /// Any other error status from the API server
    #[error("API server returned {code} listing secrets in namespace {namespace}: {message}")]
    Api {
        namespace: String,
        code: u16,
        message: String,
    },
    /// The request never produced an API response
    #[error("request to API server failed: {0}")]
    Transport(#[source] kube::Error),
}

impl ListOperationError {
    /// Classify a client error for the given namespace
    pub fn from_kube(namespace: &str, error: kube::Error) -> Self {
        match error {
            kube::Error::Api(ae) if ae.code == 403 => ListOperationError::Forbidden {
                namespace: namespace.to_string(),
                message: ae.message.clone(),
            },
            kube::Error::Api(ae) if ae.code == 401 => ListOperationError::Unauthorized {
                message: ae.message.clone(),
            },
            kube::Error::Api(ae) => ListOperationError::Api {
                namespace: namespace.to_string(),
                code: ae.code,
                message: ae.message.clone(),
            },
            other => ListOperationError::Transport(other),
        }
    }

    /// Get reason string for metrics and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            ListOperationError::Forbidden { .. } => "forbidden",
            ListOperationError::Unauthorized { .. } => "unauthorized",
            ListOperationError::Timeout { .. } => "timeout",
            ListOperationError::Api { .. } => "api_error",
            ListOperationError::Transport(_) => "transport",
        }
    }

    /// Get remediation guidance for this error
    pub fn remediation(&self) -> &'static str {
        match self {
            ListOperationError::Forbidden { .. } => {
                "Grant the ServiceAccount a Role with verb 'list' on 'secrets' in this namespace and bind it with a RoleBinding. 'get' alone does not allow listing."
            }
            ListOperationError::Unauthorized { .. } => {
                "The token was rejected. Check that the ServiceAccount still exists and that the projected token is being refreshed."
            }
            ListOperationError::Timeout { .. } => {
                "The API server did not answer in time. This is usually transient; raise LIST_TIMEOUT_SECS if it persists."
            }
            ListOperationError::Api { .. } => {
                "The API server returned an unexpected status. Check the API server logs for the request."
            }
            ListOperationError::Transport(_) => {
                "Could not reach the API server. Check network policies and KUBERNETES_SERVICE_HOST."
            }
        }
    }
}

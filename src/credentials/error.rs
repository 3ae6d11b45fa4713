//! # Credential Error Types
//!
//! Failures while resolving the credential the service authenticates with.

use kube::config::KubeconfigError;
use std::path::PathBuf;
use thiserror::Error;

/// Credential resolution error
///
/// Every variant is fatal at start-up: the listener never starts without a credential.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// The kubeconfig path exists in some form but could not be inspected
    #[error("failed to stat kubeconfig {}: {source}", .path.display())]
    KubeconfigStat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The kubeconfig file could not be read or parsed
    #[error("failed to read kubeconfig {}: {source}", .path.display())]
    KubeconfigRead {
        path: PathBuf,
        #[source]
        source: KubeconfigError,
    },
    /// The kubeconfig parsed but does not yield a usable configuration
    #[error("failed to load kubeconfig {}: {source}", .path.display())]
    KubeconfigLoad {
        path: PathBuf,
        #[source]
        source: KubeconfigError,
    },
    /// No kubeconfig and the in-cluster environment is incomplete
    #[error("no kubeconfig found and not running in a cluster: {var} is not set")]
    InClusterEnvMissing { var: &'static str },
    /// The mounted ServiceAccount token could not be read
    #[error("failed to read service account token {}: {source}", .path.display())]
    TokenUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The mounted ServiceAccount token is empty
    #[error("service account token {} is empty", .path.display())]
    TokenEmpty { path: PathBuf },
    /// The in-cluster configuration was assembled but rejected
    #[error("failed to build in-cluster configuration: {source}")]
    InClusterConfig {
        #[source]
        source: KubeconfigError,
    },
}

impl CredentialError {
    /// Get remediation guidance for this error
    pub fn remediation(&self) -> &'static str {
        match self {
            CredentialError::KubeconfigStat { .. } => {
                "Check that the kubeconfig path (KUBECONFIG or --kubeconfig) points to a readable file."
            }
            CredentialError::KubeconfigRead { .. } | CredentialError::KubeconfigLoad { .. } => {
                "Verify the kubeconfig is valid YAML and its current context names an existing cluster and user."
            }
            CredentialError::InClusterEnvMissing { .. } => {
                "Provide a kubeconfig when running outside a cluster, or run the service in a pod with a ServiceAccount."
            }
            CredentialError::TokenUnreadable { .. } | CredentialError::TokenEmpty { .. } => {
                "Verify the pod mounts a ServiceAccount token (automountServiceAccountToken or a projected volume)."
            }
            CredentialError::InClusterConfig { .. } => {
                "Verify KUBERNETES_SERVICE_HOST/KUBERNETES_SERVICE_PORT and the mounted ca.crt are valid."
            }
        }
    }
}

//! # Credentials
//!
//! Resolves the credential the service authenticates to the control plane with.
//!
//! A kubeconfig file at the configured path wins; without one the service falls back to
//! the in-cluster ServiceAccount. Either way the result is a [`CredentialSource`] that
//! produces a `kube::Config` on demand, so tests can substitute their own source.

mod error;
mod kubeconfig;
mod service_account;

pub use error::CredentialError;
pub use kubeconfig::KubeconfigFile;
pub use service_account::{InClusterEnv, ServiceAccount};

use async_trait::async_trait;
use kube::Config;
use std::io::ErrorKind;
use std::path::Path;
use tracing::info;

/// Produces current client configuration for one credential
#[async_trait]
pub trait CredentialSource: Send + Sync + std::fmt::Debug {
    /// Human-readable description for logs, never containing secret material
    fn describe(&self) -> String;

    /// Build client configuration from the credential's current state
    async fn load(&self) -> Result<Config, CredentialError>;
}

/// A credential source together with the configuration it produced at start-up
#[derive(Debug)]
pub struct ResolvedCredential {
    pub source: Box<dyn CredentialSource>,
    pub config: Config,
}

/// Pick the credential source without loading it
///
/// Only "not found" falls through to the in-cluster environment; any other stat failure
/// on the kubeconfig path is reported rather than silently ignored.
pub fn select_source(
    kubeconfig_path: &Path,
    context: Option<String>,
    in_cluster: &InClusterEnv,
) -> Result<Box<dyn CredentialSource>, CredentialError> {
    match std::fs::metadata(kubeconfig_path) {
        Ok(_) => Ok(Box::new(KubeconfigFile::new(kubeconfig_path, context))),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Ok(Box::new(ServiceAccount::from_env(in_cluster)?))
        }
        Err(source) => Err(CredentialError::KubeconfigStat {
            path: kubeconfig_path.to_path_buf(),
            source,
        }),
    }
}

/// Resolve and load the credential once
pub async fn resolve_credential(
    kubeconfig_path: &Path,
    context: Option<String>,
    in_cluster: &InClusterEnv,
) -> Result<ResolvedCredential, CredentialError> {
    let source = select_source(kubeconfig_path, context, in_cluster)?;
    let config = source.load().await?;
    info!(
        credential = %source.describe(),
        cluster_url = %config.cluster_url,
        "Resolved cluster credential"
    );
    Ok(ResolvedCredential { source, config })
}

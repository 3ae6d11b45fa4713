//! # Kubeconfig Credential
//!
//! Builds client configuration from a kubeconfig file on local disk.

use super::{CredentialError, CredentialSource};
use async_trait::async_trait;
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::Config;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Kubeconfig file credential
#[derive(Debug, Clone)]
pub struct KubeconfigFile {
    path: PathBuf,
    context: Option<String>,
}

impl KubeconfigFile {
    pub fn new(path: impl Into<PathBuf>, context: Option<String>) -> Self {
        Self {
            path: path.into(),
            context,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CredentialSource for KubeconfigFile {
    fn describe(&self) -> String {
        match &self.context {
            Some(context) => format!("kubeconfig {} (context {context})", self.path.display()),
            None => format!("kubeconfig {}", self.path.display()),
        }
    }

    async fn load(&self) -> Result<Config, CredentialError> {
        let kubeconfig =
            Kubeconfig::read_from(&self.path).map_err(|source| CredentialError::KubeconfigRead {
                path: self.path.clone(),
                source,
            })?;

        let options = KubeConfigOptions {
            context: self.context.clone(),
            ..KubeConfigOptions::default()
        };

        let config = Config::from_custom_kubeconfig(kubeconfig, &options)
            .await
            .map_err(|source| CredentialError::KubeconfigLoad {
                path: self.path.clone(),
                source,
            })?;

        debug!(
            path = %self.path.display(),
            cluster_url = %config.cluster_url,
            namespace = %config.default_namespace,
            "Loaded kubeconfig"
        );
        Ok(config)
    }
}

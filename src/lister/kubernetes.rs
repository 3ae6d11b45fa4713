//! # Kubernetes Secret Lister
//!
//! Lists Secret names through the Kubernetes API with a metadata-only list.

use super::{ListOperationError, SecretLister, SecretSummary};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::api::{Api, ListParams, ResourceExt};
use kube::Client;
use std::time::Duration;
use tracing::debug;

/// Lists Secret names in one namespace with the shared client
#[derive(Clone)]
pub struct KubeSecretLister {
    api: Api<Secret>,
    namespace: String,
    timeout: Duration,
}

impl std::fmt::Debug for KubeSecretLister {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeSecretLister")
            .field("namespace", &self.namespace)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl KubeSecretLister {
    pub fn new(client: Client, namespace: impl Into<String>, timeout: Duration) -> Self {
        let namespace = namespace.into();
        Self {
            api: Api::namespaced(client, &namespace),
            namespace,
            timeout,
        }
    }
}

#[async_trait]
impl SecretLister for KubeSecretLister {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    async fn list_secret_names(&self) -> Result<Vec<SecretSummary>, ListOperationError> {
        // No label/field selectors, no limit: one plain list call
        let list = match tokio::time::timeout(
            self.timeout,
            self.api.list_metadata(&ListParams::default()),
        )
        .await
        {
            Ok(Ok(list)) => list,
            Ok(Err(e)) => return Err(ListOperationError::from_kube(&self.namespace, e)),
            Err(_elapsed) => {
                return Err(ListOperationError::Timeout {
                    namespace: self.namespace.clone(),
                    after: self.timeout,
                })
            }
        };

        let names: Vec<SecretSummary> = list
            .items
            .iter()
            .map(|item| SecretSummary::new(item.name_any()))
            .collect();

        debug!(
            namespace = %self.namespace,
            count = names.len(),
            "Listed secrets"
        );
        Ok(names)
    }
}

//! # In-Cluster ServiceAccount Credential
//!
//! Builds client configuration from the environment the platform gives every pod:
//! `KUBERNETES_SERVICE_HOST`/`KUBERNETES_SERVICE_PORT` and the mounted ServiceAccount
//! directory (`token`, `ca.crt`, `namespace`).
//!
//! The configuration references the token by path (`tokenFile`) rather than by value.
//! The Kubernetes client re-reads the file on its own schedule, so a projected token
//! rotated by the kubelet is picked up without rebuilding the client.
//!
//! `Config::incluster()` is not used: it reads the fixed mount path and always dials
//! https, while here the ServiceAccount directory and API server address come from
//! configuration, which also lets tests point at a plain-http API server.

use super::{CredentialError, CredentialSource};
use crate::constants::{
    SERVICE_ACCOUNT_CA_FILE, SERVICE_ACCOUNT_NAMESPACE_FILE, SERVICE_ACCOUNT_TOKEN_FILE,
    SERVICE_HOST_ENV, SERVICE_PORT_ENV,
};
use async_trait::async_trait;
use kube::config::{
    AuthInfo, Cluster, Context, KubeConfigOptions, Kubeconfig, NamedAuthInfo, NamedCluster,
    NamedContext,
};
use kube::Config;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const IN_CLUSTER_NAME: &str = "in-cluster";
const SERVICE_ACCOUNT_USER: &str = "service-account";

/// Snapshot of the in-cluster environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InClusterEnv {
    pub service_host: Option<String>,
    pub service_port: Option<String>,
    pub service_account_dir: PathBuf,
}

impl InClusterEnv {
    /// Read the API server address from the process environment
    pub fn from_env(service_account_dir: impl Into<PathBuf>) -> Self {
        Self {
            service_host: std::env::var(SERVICE_HOST_ENV).ok(),
            service_port: std::env::var(SERVICE_PORT_ENV).ok(),
            service_account_dir: service_account_dir.into(),
        }
    }
}

/// Mounted ServiceAccount credential
#[derive(Debug, Clone)]
pub struct ServiceAccount {
    api_server: String,
    service_account_dir: PathBuf,
}

impl ServiceAccount {
    pub fn new(api_server: impl Into<String>, service_account_dir: impl Into<PathBuf>) -> Self {
        Self {
            api_server: api_server.into(),
            service_account_dir: service_account_dir.into(),
        }
    }

    /// Build from the in-cluster environment
    ///
    /// Fails with `InClusterEnvMissing` when either service variable is absent or empty.
    pub fn from_env(env: &InClusterEnv) -> Result<Self, CredentialError> {
        let host = env
            .service_host
            .as_deref()
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .ok_or(CredentialError::InClusterEnvMissing {
                var: SERVICE_HOST_ENV,
            })?;
        let port = env
            .service_port
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or(CredentialError::InClusterEnvMissing {
                var: SERVICE_PORT_ENV,
            })?;

        Ok(Self::new(
            api_server_url(host, port),
            env.service_account_dir.clone(),
        ))
    }

    pub fn api_server(&self) -> &str {
        &self.api_server
    }

    pub fn token_path(&self) -> PathBuf {
        self.service_account_dir.join(SERVICE_ACCOUNT_TOKEN_FILE)
    }

    fn ca_path(&self) -> PathBuf {
        self.service_account_dir.join(SERVICE_ACCOUNT_CA_FILE)
    }

    fn namespace_path(&self) -> PathBuf {
        self.service_account_dir.join(SERVICE_ACCOUNT_NAMESPACE_FILE)
    }

    /// Check the token is present and non-empty without keeping its value
    fn verify_token(&self) -> Result<PathBuf, CredentialError> {
        let path = self.token_path();
        let token = std::fs::read_to_string(&path).map_err(|source| {
            CredentialError::TokenUnreadable {
                path: path.clone(),
                source,
            }
        })?;
        if token.trim().is_empty() {
            return Err(CredentialError::TokenEmpty { path });
        }
        Ok(path)
    }

    fn read_namespace(&self) -> Option<String> {
        std::fs::read_to_string(self.namespace_path())
            .ok()
            .map(|ns| ns.trim().to_string())
            .filter(|ns| !ns.is_empty())
    }

    fn to_kubeconfig(&self, token_path: &Path) -> Kubeconfig {
        let ca_path = self.ca_path();
        let certificate_authority = if ca_path.exists() {
            Some(path_string(&ca_path))
        } else {
            warn!(
                path = %ca_path.display(),
                "ServiceAccount CA bundle not found, falling back to the default trust roots"
            );
            None
        };

        Kubeconfig {
            clusters: vec![NamedCluster {
                name: IN_CLUSTER_NAME.to_string(),
                cluster: Some(Cluster {
                    server: Some(self.api_server.clone()),
                    certificate_authority,
                    ..Cluster::default()
                }),
            }],
            auth_infos: vec![NamedAuthInfo {
                name: SERVICE_ACCOUNT_USER.to_string(),
                auth_info: Some(AuthInfo {
                    token_file: Some(path_string(token_path)),
                    ..AuthInfo::default()
                }),
            }],
            contexts: vec![NamedContext {
                name: IN_CLUSTER_NAME.to_string(),
                context: Some(Context {
                    cluster: IN_CLUSTER_NAME.to_string(),
                    user: Some(SERVICE_ACCOUNT_USER.to_string()),
                    namespace: self.read_namespace(),
                    ..Context::default()
                }),
            }],
            current_context: Some(IN_CLUSTER_NAME.to_string()),
            ..Kubeconfig::default()
        }
    }
}

#[async_trait]
impl CredentialSource for ServiceAccount {
    fn describe(&self) -> String {
        format!(
            "in-cluster service account ({}, token {})",
            self.api_server,
            self.token_path().display()
        )
    }

    async fn load(&self) -> Result<Config, CredentialError> {
        let token_path = self.verify_token()?;
        let kubeconfig = self.to_kubeconfig(&token_path);

        let config = Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
            .await
            .map_err(|source| CredentialError::InClusterConfig { source })?;

        debug!(
            cluster_url = %config.cluster_url,
            namespace = %config.default_namespace,
            token_file = %token_path.display(),
            "Loaded in-cluster configuration"
        );
        Ok(config)
    }
}

/// `https://host:port`, bracketing IPv6 literals
fn api_server_url(host: &str, port: &str) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("https://[{host}]:{port}")
    } else {
        format!("https://{host}:{port}")
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_server_url_ipv4() {
        assert_eq!(api_server_url("10.96.0.1", "443"), "https://10.96.0.1:443");
    }

    #[test]
    fn test_api_server_url_ipv6_is_bracketed() {
        assert_eq!(api_server_url("fd00::1", "443"), "https://[fd00::1]:443");
        assert_eq!(api_server_url("[fd00::1]", "443"), "https://[fd00::1]:443");
    }

    #[test]
    fn test_from_env_uses_service_host_and_port() {
        let env = InClusterEnv {
            service_host: Some("10.96.0.1".to_string()),
            service_port: Some("443".to_string()),
            service_account_dir: PathBuf::from("/var/run/sa"),
        };
        let source = ServiceAccount::from_env(&env).unwrap();
        assert_eq!(source.api_server(), "https://10.96.0.1:443");
        assert_eq!(source.token_path(), PathBuf::from("/var/run/sa/token"));
    }

    #[test]
    fn test_from_env_requires_host() {
        let env = InClusterEnv {
            service_host: None,
            service_port: Some("443".to_string()),
            service_account_dir: PathBuf::from("/nonexistent"),
        };
        let err = ServiceAccount::from_env(&env).unwrap_err();
        assert!(matches!(
            err,
            CredentialError::InClusterEnvMissing { var } if var == SERVICE_HOST_ENV
        ));
    }

    #[test]
    fn test_from_env_requires_port() {
        let env = InClusterEnv {
            service_host: Some("10.96.0.1".to_string()),
            service_port: Some("  ".to_string()),
            service_account_dir: PathBuf::from("/nonexistent"),
        };
        let err = ServiceAccount::from_env(&env).unwrap_err();
        assert!(matches!(
            err,
            CredentialError::InClusterEnvMissing { var } if var == SERVICE_PORT_ENV
        ));
    }

    #[test]
    fn test_kubeconfig_references_token_by_path() {
        let sa = ServiceAccount::new("https://10.96.0.1:443", "/var/run/sa");
        let kubeconfig = sa.to_kubeconfig(Path::new("/var/run/sa/token"));

        let auth = kubeconfig.auth_infos[0]
            .auth_info
            .as_ref()
            .expect("auth info");
        assert_eq!(auth.token_file.as_deref(), Some("/var/run/sa/token"));
        assert!(auth.token.is_none());
        assert_eq!(
            kubeconfig.current_context.as_deref(),
            Some(IN_CLUSTER_NAME)
        );
    }
}

//! # Service Settings
//!
//! Credential, namespace and timeout settings loaded from environment variables.

use crate::constants::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_KUBECONFIG_RELATIVE_PATH, DEFAULT_LIST_TIMEOUT_SECS,
    DEFAULT_READ_TIMEOUT_SECS, DEFAULT_SERVICE_ACCOUNT_DIR, DEFAULT_STARTUP_PROBE_TIMEOUT_SECS,
};
use std::path::PathBuf;
use std::time::Duration;

/// Secret lister configuration
///
/// All settings have sensible defaults and can be overridden via environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Kubeconfig file checked first when resolving the credential
    pub kubeconfig_path: PathBuf,
    /// Kubeconfig context to use instead of the current context
    pub kube_context: Option<String>,
    /// Namespace to list Secrets in
    /// Falls back to the credential's namespace when unset
    pub namespace: Option<String>,
    /// Directory holding the mounted ServiceAccount token, CA and namespace
    pub service_account_dir: PathBuf,
    /// Upper bound on one list call (seconds)
    pub list_timeout_secs: u64,
    /// Kubernetes client connect timeout (seconds)
    pub connect_timeout_secs: u64,
    /// Kubernetes client read timeout (seconds)
    pub read_timeout_secs: u64,
    /// Probe the API server once before accepting traffic
    pub startup_probe: bool,
    /// Upper bound on the start-up probe (seconds)
    pub startup_probe_timeout_secs: u64,
    /// Answer failed list calls with 200 and a null list instead of an error status
    pub mask_list_errors: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            kubeconfig_path: default_kubeconfig_path(None, None),
            kube_context: None,
            namespace: None,
            service_account_dir: PathBuf::from(DEFAULT_SERVICE_ACCOUNT_DIR),
            list_timeout_secs: DEFAULT_LIST_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            read_timeout_secs: DEFAULT_READ_TIMEOUT_SECS,
            startup_probe: true,
            startup_probe_timeout_secs: DEFAULT_STARTUP_PROBE_TIMEOUT_SECS,
            mask_list_errors: false,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    ///
    /// `from_env` delegates here; tests pass a map instead of mutating the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            kubeconfig_path: default_kubeconfig_path(lookup("KUBECONFIG"), lookup("HOME")),
            kube_context: non_empty(lookup("KUBE_CONTEXT")),
            namespace: non_empty(lookup("TARGET_NAMESPACE")),
            service_account_dir: non_empty(lookup("SERVICE_ACCOUNT_DIR"))
                .map_or_else(|| PathBuf::from(DEFAULT_SERVICE_ACCOUNT_DIR), PathBuf::from),
            list_timeout_secs: var_or_default(&lookup, "LIST_TIMEOUT_SECS", DEFAULT_LIST_TIMEOUT_SECS),
            connect_timeout_secs: var_or_default(
                &lookup,
                "CONNECT_TIMEOUT_SECS",
                DEFAULT_CONNECT_TIMEOUT_SECS,
            ),
            read_timeout_secs: var_or_default(&lookup, "READ_TIMEOUT_SECS", DEFAULT_READ_TIMEOUT_SECS),
            startup_probe: var_or_default(&lookup, "STARTUP_PROBE", true),
            startup_probe_timeout_secs: var_or_default(
                &lookup,
                "STARTUP_PROBE_TIMEOUT_SECS",
                DEFAULT_STARTUP_PROBE_TIMEOUT_SECS,
            ),
            mask_list_errors: var_or_default(&lookup, "MASK_LIST_ERRORS", false),
        }
    }

    pub fn list_timeout(&self) -> Duration {
        Duration::from_secs(self.list_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    pub fn startup_probe_timeout(&self) -> Duration {
        Duration::from_secs(self.startup_probe_timeout_secs)
    }
}

/// Resolve the kubeconfig path the way kubectl does: first entry of `KUBECONFIG`,
/// then `$HOME/.kube/config`
fn default_kubeconfig_path(kubeconfig: Option<String>, home: Option<String>) -> PathBuf {
    if let Some(first) = kubeconfig
        .as_deref()
        .and_then(|value| std::env::split_paths(value).next())
        .filter(|path| !path.as_os_str().is_empty())
    {
        return first;
    }
    match non_empty(home) {
        Some(home) => PathBuf::from(home).join(DEFAULT_KUBECONFIG_RELATIVE_PATH),
        None => PathBuf::from(DEFAULT_KUBECONFIG_RELATIVE_PATH),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read a variable through `lookup` or return the default value
fn var_or_default<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

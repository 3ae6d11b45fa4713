//! # Constants
//!
//! Fixed values and defaults shared across the service.

/// Port the HTTP listener binds to. Not configurable at runtime.
pub const LISTEN_PORT: u16 = 8400;

/// Route serving the Secret name listing
pub const LIST_SECRETS_ROUTE: &str = "/listSecrets";

/// Liveness probe route
pub const HEALTHZ_ROUTE: &str = "/healthz";

/// Readiness probe route
pub const READYZ_ROUTE: &str = "/readyz";

/// Prometheus exposition route
pub const METRICS_ROUTE: &str = "/metrics";

/// Kubeconfig location relative to `$HOME` when `KUBECONFIG` is unset
pub const DEFAULT_KUBECONFIG_RELATIVE_PATH: &str = ".kube/config";

/// Directory where the platform mounts the projected ServiceAccount token
pub const DEFAULT_SERVICE_ACCOUNT_DIR: &str = "/var/run/secrets/kubernetes.io/serviceaccount";

/// File names inside the ServiceAccount directory
pub const SERVICE_ACCOUNT_TOKEN_FILE: &str = "token";
pub const SERVICE_ACCOUNT_CA_FILE: &str = "ca.crt";
pub const SERVICE_ACCOUNT_NAMESPACE_FILE: &str = "namespace";

/// Environment variables injected into every pod by the kubelet
pub const SERVICE_HOST_ENV: &str = "KUBERNETES_SERVICE_HOST";
pub const SERVICE_PORT_ENV: &str = "KUBERNETES_SERVICE_PORT";

/// Namespace used when neither configuration nor credential names one
pub const DEFAULT_NAMESPACE: &str = "default";

/// Upper bound on a single list call against the control plane (seconds)
pub const DEFAULT_LIST_TIMEOUT_SECS: u64 = 10;

/// Kubernetes client connect timeout (seconds)
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Kubernetes client read timeout (seconds)
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 30;

/// Upper bound on the start-up reachability probe (seconds)
pub const DEFAULT_STARTUP_PROBE_TIMEOUT_SECS: u64 = 10;

/// Default tracing filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "secret_lister=info,tower_http=info";

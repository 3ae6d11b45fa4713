//! # Initialization
//!
//! Start-up logic: rustls setup, tracing, metrics, credential resolution, client
//! construction and listener bind. Every step is fail-fast; the listener is bound last
//! so no request is ever served without a working client.

use crate::client::{build_client, install_crypto_provider, probe_api_server};
use crate::config::ServiceConfig;
use crate::constants::{DEFAULT_LOG_FILTER, DEFAULT_NAMESPACE};
use crate::credentials::{resolve_credential, InClusterEnv};
use crate::lister::{KubeSecretLister, SecretLister};
use crate::observability;
use crate::server::{bind_listener, AppState};
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn, Instrument};

/// Initialization result containing everything the serve loop needs
///
/// The Kubernetes client lives inside the lister held by `state`.
#[derive(Debug)]
pub struct InitializationResult {
    /// Router state
    pub state: AppState,
    /// Bound listener on the fixed service port
    pub listener: TcpListener,
}

/// Set up the tracing subscriber
///
/// `RUST_LOG` wins over the default filter. Calling this twice keeps the first subscriber.
pub fn init_tracing() {
    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .try_init()
    {
        warn!("Tracing subscriber init returned error (may already be initialized): {}", e);
    }
}

/// Namespace to list in: explicit configuration, then the credential's namespace
pub fn effective_namespace(configured: Option<&str>, credential_default: &str) -> String {
    configured
        .or_else(|| Some(credential_default).filter(|ns| !ns.is_empty()))
        .unwrap_or(DEFAULT_NAMESPACE)
        .to_string()
}

/// Initialize the service runtime
///
/// This function handles:
/// - rustls crypto provider setup
/// - Tracing subscriber setup
/// - Metrics registration
/// - Credential resolution (kubeconfig, then in-cluster ServiceAccount)
/// - Kubernetes client creation and optional reachability probe
/// - Listener bind
pub async fn initialize(config: &ServiceConfig) -> Result<InitializationResult> {
    // Configure rustls crypto provider FIRST, before any other operations
    install_crypto_provider();

    init_tracing();

    info!("Starting Secret Lister v{}", env!("CARGO_PKG_VERSION"));

    observability::metrics::register_metrics()?;

    let in_cluster = InClusterEnv::from_env(config.service_account_dir.clone());
    let credential = match resolve_credential(
        &config.kubeconfig_path,
        config.kube_context.clone(),
        &in_cluster,
    )
    .instrument(tracing::info_span!("startup.credential"))
    .await
    {
        Ok(credential) => credential,
        Err(e) => {
            error!(error = %e, "Failed to resolve cluster credential");
            error!("Remediation: {}", e.remediation());
            return Err(e).context("Credential resolution failed");
        }
    };

    let namespace = effective_namespace(
        config.namespace.as_deref(),
        &credential.config.default_namespace,
    );
    let cluster_url = credential.config.cluster_url.to_string();

    let client = build_client(
        credential.config,
        config.connect_timeout(),
        config.read_timeout(),
    )
    .inspect_err(|e| error!(error = %e, "Failed to construct Kubernetes client"))
    .context("Client construction failed")?;

    if config.startup_probe {
        probe_api_server(&client, &cluster_url, config.startup_probe_timeout())
            .await
            .inspect_err(|e| error!(error = %e, "API server start-up probe failed"))
            .context("Client construction failed")?;
    } else {
        info!("Start-up probe disabled, skipping API server reachability check");
    }

    let lister: Arc<dyn SecretLister> = Arc::new(KubeSecretLister::new(
        client,
        namespace.clone(),
        config.list_timeout(),
    ));
    let state = AppState::new(lister, config.mask_list_errors);

    if config.mask_list_errors {
        warn!("MASK_LIST_ERRORS is enabled: failed list calls answer 200 with a null SecretsList");
    }

    let listener = bind_listener().await?;

    info!(
        namespace = %namespace,
        cluster_url = %cluster_url,
        "Secret lister initialized"
    );

    Ok(InitializationResult {
        state,
        listener,
    })
}

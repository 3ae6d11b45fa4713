//! # Secret Lister
//!
//! An HTTP service that lists the names of the Kubernetes Secrets its credential may see
//! in one namespace.
//!
//! ## Overview
//!
//! On every `GET /listSecrets` the service:
//!
//! 1. **Uses the credential resolved at start-up** - a kubeconfig file if one exists at the
//!    configured path, otherwise the pod's mounted ServiceAccount token
//! 2. **Lists Secrets** - one metadata-only list call against the configured namespace
//! 3. **Returns names only** - `{"SecretsList": [...]}`, never Secret data
//!
//! What the service may list is decided entirely by the RBAC Role bound to its
//! ServiceAccount. A Role granting `get` but not `list` produces a 403 from
//! `/listSecrets` (or a 200 with a null list when `MASK_LIST_ERRORS=true`).
//!
//! The service listens on port 8400. Start-up fails fast: without a usable credential
//! and client the listener is never bound.

use anyhow::Result;
use clap::Parser;
use secret_lister::config::{load_config, ServiceConfig};
use std::path::PathBuf;

/// Command-line overrides for the environment configuration
#[derive(Debug, Parser)]
#[command(name = "secret-lister", version, about = "List Kubernetes Secret names over HTTP")]
struct Cli {
    /// Kubeconfig file to try before falling back to the in-cluster ServiceAccount
    #[arg(long)]
    kubeconfig: Option<PathBuf>,

    /// Kubeconfig context to use
    #[arg(long)]
    context: Option<String>,

    /// Namespace to list Secrets in
    #[arg(long, short = 'n')]
    namespace: Option<String>,

    /// Answer failed list calls with 200 and a null SecretsList
    #[arg(long)]
    mask_list_errors: bool,

    /// Skip the API server reachability check at start-up
    #[arg(long)]
    skip_startup_probe: bool,
}

impl Cli {
    fn apply(self, mut config: ServiceConfig) -> ServiceConfig {
        if let Some(path) = self.kubeconfig {
            config.kubeconfig_path = path;
        }
        if self.context.is_some() {
            config.kube_context = self.context;
        }
        if self.namespace.is_some() {
            config.namespace = self.namespace;
        }
        if self.mask_list_errors {
            config.mask_list_errors = true;
        }
        if self.skip_startup_probe {
            config.startup_probe = false;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Cli::parse().apply(load_config());
    secret_lister::runtime::run(config).await
}

//! # HTTP Server
//!
//! axum server exposing the Secret name listing plus liveness, readiness and metrics.
//!
//! | Route | Purpose |
//! |---|---|
//! | `GET /listSecrets` | Secret names in the configured namespace |
//! | `GET /healthz` | Liveness, always `ok` while the process serves |
//! | `GET /readyz` | Readiness, `ready` once the listener is bound |
//! | `GET /metrics` | Prometheus exposition |

mod handlers;

pub use handlers::{healthz, list_secrets, metrics_text, readyz, status_for};

use crate::constants::{
    HEALTHZ_ROUTE, LISTEN_PORT, LIST_SECRETS_ROUTE, METRICS_ROUTE, READYZ_ROUTE,
};
use crate::lister::SecretLister;
use anyhow::{Context, Result};
use axum::routing::get;
use axum::Router;
use std::future::Future;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared state handed to every request handler
///
/// Built once at start-up and never mutated, apart from the readiness flag.
#[derive(Clone)]
pub struct AppState {
    pub lister: Arc<dyn SecretLister>,
    /// Answer list failures with 200 and `{"SecretsList":null}`
    pub mask_list_errors: bool,
    pub is_ready: Arc<AtomicBool>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("namespace", &self.lister.namespace())
            .field("mask_list_errors", &self.mask_list_errors)
            .field("is_ready", &self.is_ready.load(Ordering::Relaxed))
            .finish()
    }
}

impl AppState {
    pub fn new(lister: Arc<dyn SecretLister>, mask_list_errors: bool) -> Self {
        Self {
            lister,
            mask_list_errors,
            is_ready: Arc::new(AtomicBool::new(false)),
        }
    }
}

/// Build the router with request tracing
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(LIST_SECRETS_ROUTE, get(list_secrets))
        .route(HEALTHZ_ROUTE, get(healthz))
        .route(READYZ_ROUTE, get(readyz))
        .route(METRICS_ROUTE, get(metrics_text))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the fixed service port on all interfaces
pub async fn bind_listener() -> Result<TcpListener> {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, LISTEN_PORT));
    TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind HTTP listener on {addr}"))
}

/// Serve until `shutdown` resolves
///
/// Readiness flips to true once serving starts and back to false when shutdown begins,
/// so in-flight requests drain while new traffic is steered away.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener
        .local_addr()
        .context("Failed to read listener address")?;
    let is_ready = Arc::clone(&state.is_ready);
    let app = router(state);

    is_ready.store(true, Ordering::Relaxed);
    info!(%addr, "HTTP server listening");

    let drain_flag = Arc::clone(&is_ready);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.await;
            drain_flag.store(false, Ordering::Relaxed);
            info!("Shutdown signal received, draining HTTP server");
        })
        .await
        .context("HTTP server error")?;

    is_ready.store(false, Ordering::Relaxed);
    info!("HTTP server stopped");
    Ok(())
}

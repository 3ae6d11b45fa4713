//! # Request Handlers

use super::AppState;
use crate::lister::{ListOperationError, ListSecretsResponse};
use crate::observability::metrics;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use std::sync::atomic::Ordering;
use std::time::Instant;
use tracing::{error, info, warn};

/// Map a list failure to the status surfaced to the caller
pub fn status_for(error: &ListOperationError) -> StatusCode {
    match error {
        ListOperationError::Forbidden { .. } => StatusCode::FORBIDDEN,
        ListOperationError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        ListOperationError::Unauthorized { .. }
        | ListOperationError::Api { .. }
        | ListOperationError::Transport(_) => StatusCode::BAD_GATEWAY,
    }
}

/// `GET /listSecrets`
///
/// One list call per request, no caching, no retry.
pub async fn list_secrets(State(state): State<AppState>) -> Response {
    let namespace = state.lister.namespace().to_string();
    let started = Instant::now();
    let result = state.lister.list_secret_names().await;
    metrics::observe_list_duration(started.elapsed().as_secs_f64());

    match result {
        Ok(secrets) => {
            metrics::increment_requests("success");
            metrics::set_secrets_returned(secrets.len());
            info!(namespace = %namespace, count = secrets.len(), "Listed secrets");
            (StatusCode::OK, Json(ListSecretsResponse::listed(secrets))).into_response()
        }
        Err(e) => {
            metrics::increment_requests(e.as_str());
            error!(
                namespace = %namespace,
                reason = e.as_str(),
                error = %e,
                "Failed to list secrets"
            );
            warn!("Remediation: {}", e.remediation());

            if state.mask_list_errors {
                (StatusCode::OK, Json(ListSecretsResponse::masked())).into_response()
            } else {
                (status_for(&e), Json(ListSecretsResponse::failed(&e))).into_response()
            }
        }
    }
}

/// `GET /healthz`
pub async fn healthz() -> &'static str {
    "ok"
}

/// `GET /readyz`
pub async fn readyz(State(state): State<AppState>) -> Response {
    if state.is_ready.load(Ordering::Relaxed) {
        (StatusCode::OK, "ready").into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not ready").into_response()
    }
}

/// `GET /metrics`
pub async fn metrics_text() -> Response {
    match metrics::gather_metrics() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_forbidden_maps_to_403() {
        let err = ListOperationError::Forbidden {
            namespace: "default".to_string(),
            message: "secrets is forbidden".to_string(),
        };
        assert_eq!(status_for(&err), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_timeout_maps_to_504() {
        let err = ListOperationError::Timeout {
            namespace: "default".to_string(),
            after: Duration::from_secs(10),
        };
        assert_eq!(status_for(&err), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn test_upstream_failures_map_to_502() {
        let unauthorized = ListOperationError::Unauthorized {
            message: "Unauthorized".to_string(),
        };
        let api = ListOperationError::Api {
            namespace: "default".to_string(),
            code: 500,
            message: "etcdserver: request timed out".to_string(),
        };
        assert_eq!(status_for(&unauthorized), StatusCode::BAD_GATEWAY);
        assert_eq!(status_for(&api), StatusCode::BAD_GATEWAY);
    }
}

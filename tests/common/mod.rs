//! Shared test fixtures: an in-process fake Kubernetes API server and a
//! ServiceAccount directory on disk.

#![allow(dead_code, reason = "Each test binary uses a different subset of the fixtures")]

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use secret_lister::client::{build_client, install_crypto_provider};
use secret_lister::credentials::{CredentialSource, ServiceAccount};
use secret_lister::lister::KubeSecretLister;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

/// What the fake API server answers to a list call
#[derive(Debug, Clone)]
pub enum Behaviour {
    /// 200 with these Secret names, in this order
    List(Vec<String>),
    /// 403 Status, as RBAC answers when the `list` verb is not granted
    Forbidden,
    /// 401 Status, as the API server answers to an invalid token
    Unauthorized,
    /// Sleep before answering with an empty list
    Delay(Duration),
}

/// One request as seen by the fake API server
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub namespace: String,
    pub authorization: Option<String>,
    pub accept: Option<String>,
}

#[derive(Clone)]
struct FakeState {
    behaviour: Behaviour,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Running fake API server
pub struct FakeApiServer {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FakeApiServer {
    pub async fn start(behaviour: Behaviour) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = FakeState {
            behaviour,
            requests: Arc::clone(&requests),
        };
        let app = Router::new()
            .route("/api/v1/namespaces/{namespace}/secrets", get(list_secrets))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, requests }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn list_secrets(
    State(state): State<FakeState>,
    Path(namespace): Path<String>,
    headers: HeaderMap,
) -> Response {
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };
    state.requests.lock().unwrap().push(RecordedRequest {
        namespace: namespace.clone(),
        authorization: header_value(header::AUTHORIZATION),
        accept: header_value(header::ACCEPT),
    });

    match state.behaviour {
        Behaviour::List(names) => (StatusCode::OK, Json(metadata_list(&namespace, &names))).into_response(),
        Behaviour::Forbidden => (
            StatusCode::FORBIDDEN,
            Json(status(
                403,
                "Forbidden",
                &format!(
                    "secrets is forbidden: User \"system:serviceaccount:{namespace}:secret-lister\" cannot list resource \"secrets\" in API group \"\" in the namespace \"{namespace}\""
                ),
            )),
        )
            .into_response(),
        Behaviour::Unauthorized => (
            StatusCode::UNAUTHORIZED,
            Json(status(401, "Unauthorized", "Unauthorized")),
        )
            .into_response(),
        Behaviour::Delay(delay) => {
            tokio::time::sleep(delay).await;
            (StatusCode::OK, Json(metadata_list(&namespace, &[]))).into_response()
        }
    }
}

fn metadata_list(namespace: &str, names: &[String]) -> serde_json::Value {
    let items: Vec<_> = names
        .iter()
        .map(|name| {
            json!({
                "kind": "PartialObjectMetadata",
                "apiVersion": "meta.k8s.io/v1",
                "metadata": {
                    "name": name,
                    "namespace": namespace,
                    "resourceVersion": "1",
                }
            })
        })
        .collect();
    json!({
        "kind": "PartialObjectMetadataList",
        "apiVersion": "meta.k8s.io/v1",
        "metadata": { "resourceVersion": "42" },
        "items": items,
    })
}

fn status(code: u16, reason: &str, message: &str) -> serde_json::Value {
    json!({
        "kind": "Status",
        "apiVersion": "v1",
        "metadata": {},
        "status": "Failure",
        "message": message,
        "reason": reason,
        "details": { "kind": "secrets" },
        "code": code,
    })
}

/// ServiceAccount directory with a token and namespace file
pub fn service_account_dir(token: &str, namespace: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("token"), token).unwrap();
    std::fs::write(dir.path().join("namespace"), namespace).unwrap();
    dir
}

/// Lister talking to `server` through a real `kube::Client`, authenticated with the
/// token in `sa_dir`
pub async fn lister_for(server: &FakeApiServer, sa_dir: &TempDir, timeout: Duration) -> KubeSecretLister {
    install_crypto_provider();
    let source = ServiceAccount::new(server.url(), sa_dir.path());
    let config = source.load().await.unwrap();
    let namespace = config.default_namespace.clone();
    let client = build_client(config, Duration::from_secs(2), Duration::from_secs(5)).unwrap();
    KubeSecretLister::new(client, namespace, timeout)
}

pub fn names(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

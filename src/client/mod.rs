//! # Cluster Client Factory
//!
//! Turns a resolved configuration into the single `kube::Client` shared by every request.

use kube::{Client, Config};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Client construction error
///
/// Fatal at start-up, like [`crate::credentials::CredentialError`].
#[derive(Debug, Error)]
pub enum ClientConstructionError {
    /// The configuration was rejected while building the client (TLS material, auth plugin)
    #[error("failed to construct Kubernetes client: {0}")]
    Build(#[from] kube::Error),
    /// The API server refused or failed the start-up probe
    #[error("API server {url} is unreachable: {source}")]
    Unreachable {
        url: String,
        #[source]
        source: kube::Error,
    },
    /// The API server did not answer the start-up probe in time
    #[error("API server {url} did not answer within {}s", .timeout.as_secs())]
    ProbeTimeout { url: String, timeout: Duration },
}

/// Install ring as the process-wide rustls crypto provider
///
/// Required for rustls 0.23+ before the first TLS client config is built. A second call
/// finds the provider already installed and changes nothing.
pub fn install_crypto_provider() {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }
}

/// Build the client with connect/read timeouts applied
pub fn build_client(
    mut config: Config,
    connect_timeout: Duration,
    read_timeout: Duration,
) -> Result<Client, ClientConstructionError> {
    config.connect_timeout = Some(connect_timeout);
    config.read_timeout = Some(read_timeout);
    let client = Client::try_from(config)?;
    Ok(client)
}

/// Ask the API server for its version once, bounded by `timeout`
///
/// This only proves reachability and authentication transport; authorization for
/// listing Secrets is checked per request.
pub async fn probe_api_server(
    client: &Client,
    url: &str,
    timeout: Duration,
) -> Result<(), ClientConstructionError> {
    match tokio::time::timeout(timeout, client.apiserver_version()).await {
        Ok(Ok(version)) => {
            info!(
                api_server = url,
                version = %version.git_version,
                "API server reachable"
            );
            Ok(())
        }
        Ok(Err(source)) => Err(ClientConstructionError::Unreachable {
            url: url.to_string(),
            source,
        }),
        Err(_elapsed) => Err(ClientConstructionError::ProbeTimeout {
            url: url.to_string(),
            timeout,
        }),
    }
}

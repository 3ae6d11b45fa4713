//! # Secret Lister
//!
//! Lists the names of the Secrets visible to the service's credential in one namespace.
//!
//! Only names leave this module. The Kubernetes implementation asks the API server for
//! object metadata alone, so Secret data never reaches the process.

mod error;
mod kubernetes;

pub use error::ListOperationError;
pub use kubernetes::KubeSecretLister;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Name of one Secret object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretSummary(String);

impl SecretSummary {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SecretSummary {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Body of `GET /listSecrets`
///
/// `SecretsList` is `null` whenever the list call failed; `error` is only present
/// when the failure is surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListSecretsResponse {
    #[serde(rename = "SecretsList")]
    pub secrets_list: Option<Vec<SecretSummary>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ListSecretsResponse {
    /// Successful listing, in API response order
    pub fn listed(secrets: Vec<SecretSummary>) -> Self {
        Self {
            secrets_list: Some(secrets),
            error: None,
        }
    }

    /// Failed listing with the error surfaced
    pub fn failed(error: &ListOperationError) -> Self {
        Self {
            secrets_list: None,
            error: Some(error.to_string()),
        }
    }

    /// Failed listing with the error hidden, `{"SecretsList":null}`
    pub fn masked() -> Self {
        Self {
            secrets_list: None,
            error: None,
        }
    }
}

/// Source of Secret names for one namespace
#[async_trait]
pub trait SecretLister: Send + Sync {
    /// Namespace this lister reads from
    fn namespace(&self) -> &str;

    /// List Secret names in response order
    async fn list_secret_names(&self) -> Result<Vec<SecretSummary>, ListOperationError>;
}

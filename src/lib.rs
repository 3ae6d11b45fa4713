//! Secret Lister Library
//!
//! Core functionality of the Secret Lister: credential resolution, client construction,
//! the Secret name lister and the HTTP surface. The binary in `main.rs` only wires
//! configuration into [`runtime::run`].

pub mod client;
pub mod config;
pub mod constants;
pub mod credentials;
pub mod lister;
pub mod observability;
pub mod runtime;
pub mod server;

pub use lister::{ListOperationError, ListSecretsResponse, SecretLister, SecretSummary};

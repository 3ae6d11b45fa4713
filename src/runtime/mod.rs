//! # Runtime Module
//!
//! Runtime components for the Secret Lister: start-up and the serve loop with
//! graceful shutdown.

pub mod initialization;
pub mod shutdown;

pub use initialization::*;
pub use shutdown::*;

use crate::config::ServiceConfig;
use anyhow::Result;
use tracing::info;

/// Initialize everything, then serve until SIGTERM or Ctrl-C
///
/// Any start-up failure is returned before the listener accepts a single request.
pub async fn run(config: ServiceConfig) -> Result<()> {
    let init = initialize(&config).await?;
    crate::server::serve(init.listener, init.state, shutdown_signal()).await?;
    info!("Secret lister stopped");
    Ok(())
}

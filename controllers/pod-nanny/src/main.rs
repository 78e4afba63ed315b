//! Pod Nanny
//!
//! Sidecar that keeps the replica count of its own owning workload in step
//! with the size of the cluster:
//! - Resolves the pod's owner (ReplicationController, ReplicaSet, or the
//!   Deployment behind a ReplicaSet) once at startup
//! - Polls node capacity and applies the cores-per-replica ladder read from
//!   a mounted parameters file

mod capacity;
mod config;
mod controller;
mod error;
mod owner;
mod reconciler;
#[cfg(test)]
mod test_utils;

use crate::config::Args;
use crate::controller::{shutdown_signal, Controller};
use crate::error::ControllerError;
use clap::Parser;
use cluster_client::ClusterClient;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ControllerError> {
    let args = Args::parse();
    init_logging(args.verbose);

    info!("Starting Pod Nanny");
    info!("Invoked by {:?}", std::env::args().collect::<Vec<_>>());

    let config = args.into_config()?;
    info!("Configuration:");
    info!("  Pod: {}/{}", config.namespace, config.pod);
    info!("  Parameters: {}", config.params_path.display());
    info!("  Poll period: {:?}", config.poll_period);

    // kube's rustls backend needs a process-wide crypto provider
    let _ = rustls::crypto::ring::default_provider().install_default();

    let client = ClusterClient::try_default().await?;
    let controller = Controller::new(Arc::new(client), &config).await?;
    controller.run(shutdown_signal()).await?;

    info!("Pod Nanny stopped");
    Ok(())
}

/// `RUST_LOG` wins when set; otherwise `info`, or `debug` with `--verbose`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

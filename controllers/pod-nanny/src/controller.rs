//! Main controller implementation.
//!
//! The `Controller` resolves the owning workload once at startup and then
//! drives the reconciler on a fixed poll period until a fatal error or an
//! external shutdown.

use crate::config::NannyConfig;
use crate::error::ControllerError;
use crate::owner::resolve_owner;
use crate::reconciler::{Reconciler, TickOutcome};
use cluster_client::ClusterClientTrait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Periodic scaler for the nanny's owning workload.
#[derive(Debug)]
pub struct Controller {
    reconciler: Reconciler,
    poll_period: Duration,
}

impl Controller {
    /// Creates a new controller instance.
    ///
    /// Fails when the pod's owner cannot be determined; there is nothing to
    /// scale in that case.
    pub async fn new(
        client: Arc<dyn ClusterClientTrait>,
        config: &NannyConfig,
    ) -> Result<Self, ControllerError> {
        info!(
            "Looking for parent/owner of pod {}/{}",
            config.namespace, config.pod
        );
        let workload = resolve_owner(client.as_ref(), &config.namespace, &config.pod)
            .await
            .map_err(|e| {
                error!("Failed to determine the owner of pod {}/{}: {}", config.namespace, config.pod, e);
                e
            })?;
        info!("Managing replicas of {}", workload.scale_target());

        Ok(Self::with_reconciler(
            Reconciler::new(client, workload, &config.params_path),
            config.poll_period,
        ))
    }

    pub(crate) fn with_reconciler(reconciler: Reconciler, poll_period: Duration) -> Self {
        Self {
            reconciler,
            poll_period,
        }
    }

    /// Run ticks until a fatal error or until `shutdown` completes.
    ///
    /// The first tick runs immediately. Ticks never overlap.
    pub async fn run<F>(&self, shutdown: F) -> Result<(), ControllerError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        info!(
            "Polling every {:?} with parameters from {}",
            self.poll_period,
            self.reconciler.params_path().display()
        );

        loop {
            match self.reconciler.tick().await {
                Ok(TickOutcome::Unchanged { replicas }) => {
                    debug!("{} stays at {} replicas", self.reconciler.workload(), replicas);
                }
                Ok(TickOutcome::Scaled { from, to }) => {
                    info!(
                        "Scaled {} from {} to {} replicas",
                        self.reconciler.workload().scale_target(),
                        from,
                        to
                    );
                }
                Ok(TickOutcome::Deferred { stage, error }) => {
                    warn!("Error while {}: {}", stage, error);
                }
                Err(e) => {
                    error!("Stopping: {}", e);
                    return Err(e);
                }
            }

            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested, stopping");
                    return Ok(());
                }
                _ = tokio::time::sleep(self.poll_period) => {}
            }
        }
    }
}

/// Completes on Ctrl-C, or on SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

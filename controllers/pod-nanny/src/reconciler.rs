//! Replica reconciliation.
//!
//! One tick samples cluster capacity, reads the owning workload's replica
//! count, reloads the scaling ladder, and patches the workload when the
//! ladder asks for a different count.

use crate::capacity::sample_capacity;
use crate::error::ControllerError;
use crate::owner::WorkloadReference;
use cluster_client::{ClusterClientTrait, ScaleTarget};
use scaler::{compute_target, load_ladder};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Step of a tick that failed transiently
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStage {
    SampleCapacity,
    ReadReplicas,
    UpdateReplicas,
}

impl fmt::Display for TickStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TickStage::SampleCapacity => "sampling cluster capacity",
            TickStage::ReadReplicas => "reading current replicas",
            TickStage::UpdateReplicas => "updating replicas",
        })
    }
}

/// Result of a tick that did not hit a fatal error
#[derive(Debug)]
pub enum TickOutcome {
    /// Replica count already matches the ladder
    Unchanged { replicas: i32 },
    /// The workload was patched
    Scaled { from: i32, to: i32 },
    /// The tick was abandoned; the next poll retries
    Deferred {
        stage: TickStage,
        error: ControllerError,
    },
}

/// Reconciles the owning workload's replica count against cluster size.
pub struct Reconciler {
    client: Arc<dyn ClusterClientTrait>,
    workload: WorkloadReference,
    target: ScaleTarget,
    params_path: PathBuf,
}

impl fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reconciler")
            .field("workload", &self.workload)
            .field("params_path", &self.params_path)
            .finish_non_exhaustive()
    }
}

impl Reconciler {
    /// Creates a new reconciler for an already resolved workload.
    pub fn new(
        client: Arc<dyn ClusterClientTrait>,
        workload: WorkloadReference,
        params_path: impl Into<PathBuf>,
    ) -> Self {
        let target = workload.scale_target();
        Self {
            client,
            workload,
            target,
            params_path: params_path.into(),
        }
    }

    pub fn workload(&self) -> &WorkloadReference {
        &self.workload
    }

    pub fn params_path(&self) -> &Path {
        &self.params_path
    }

    /// Runs one reconciliation pass.
    ///
    /// Failures that [`ControllerError::is_fatal`] classifies as transient
    /// come back as [`TickOutcome::Deferred`]. An invalid parameters file or
    /// an unusable replica count is returned as `Err` and must stop the nanny.
    pub async fn tick(&self) -> Result<TickOutcome, ControllerError> {
        let snapshot = match sample_capacity(self.client.as_ref()).await {
            Ok(snapshot) => snapshot,
            Err(error) => return defer_or_fail(TickStage::SampleCapacity, error),
        };
        debug!(
            "The number of nodes is {}, schedulable nodes: {}",
            snapshot.total_nodes, snapshot.schedulable_nodes
        );

        let current = match self.client.get_replicas(&self.target).await {
            Ok(replicas) => replicas,
            Err(error) => return defer_or_fail(TickStage::ReadReplicas, error.into()),
        };
        debug!("There are {} pod replicas", current);

        let ladder = load_ladder(&self.params_path)?;
        let expected = compute_target(&ladder, snapshot.schedulable_nodes, snapshot.schedulable_cores);
        debug!(
            "The expected number of replicas is {} for {} schedulable cores",
            expected, snapshot.schedulable_cores
        );

        let expected = i32::try_from(expected)
            .ok()
            .filter(|replicas| *replicas >= 1)
            .ok_or_else(|| {
                ControllerError::InvalidDecision(format!(
                    "cannot scale {} to replica count of {}",
                    self.target, expected
                ))
            })?;

        if current == expected {
            debug!("Replicas are within the expected limits.");
            return Ok(TickOutcome::Unchanged { replicas: current });
        }

        info!(
            "Replicas are not within the expected limits: updating {} from {} to {} replicas",
            self.target, current, expected
        );
        if let Err(error) = self.client.set_replicas(&self.target, expected).await {
            return defer_or_fail(TickStage::UpdateReplicas, error.into());
        }

        Ok(TickOutcome::Scaled {
            from: current,
            to: expected,
        })
    }
}

/// Abandon the tick for a transient error; fatal errors propagate.
fn defer_or_fail(stage: TickStage, error: ControllerError) -> Result<TickOutcome, ControllerError> {
    if error.is_fatal() {
        return Err(error);
    }
    Ok(TickOutcome::Deferred { stage, error })
}

#[cfg(test)]
#[path = "reconciler_test.rs"]
mod reconciler_test;

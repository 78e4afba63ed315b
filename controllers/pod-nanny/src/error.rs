//! Controller-specific error types.
//!
//! This module defines error types specific to the Pod Nanny that are not
//! covered by upstream library errors.

use cluster_client::ClusterError;
use scaler::ParamsError;
use thiserror::Error;

/// Errors that can occur in the Pod Nanny.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Cluster API error
    #[error("Kubernetes error: {0}")]
    Cluster(#[from] ClusterError),

    /// The pod has no supported controlling workload
    #[error("Ownership error: {0}")]
    Ownership(String),

    /// Cluster capacity could not be computed
    #[error("Capacity error: {0}")]
    Capacity(String),

    /// Scaling parameters file is missing or invalid
    #[error("Invalid scaling parameters: {0}")]
    InvalidParams(#[from] ParamsError),

    /// Computed replica count cannot be applied
    #[error("Invalid replica decision: {0}")]
    InvalidDecision(String),

    /// Invalid process configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ControllerError {
    /// Whether this error ends the process when raised during a tick.
    ///
    /// Cluster API and capacity failures abandon the tick and are retried on
    /// the next poll; everything else needs an operator.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ControllerError::Cluster(_) | ControllerError::Capacity(_))
    }
}

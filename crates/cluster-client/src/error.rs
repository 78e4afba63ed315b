//! Cluster client errors

use thiserror::Error;

/// Errors that can occur when talking to the Kubernetes API
#[derive(Debug, Error)]
pub enum ClusterError {
    /// Kubernetes client or API server error
    #[error("Kubernetes error: {0}")]
    Kube(#[from] kube::Error),

    /// The API server rejected or failed the request
    #[error("Cluster API error: {0}")]
    Api(String),

    /// Requested object does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// A kind string that does not name a scalable workload
    #[error("Unsupported workload kind: {0}")]
    UnsupportedKind(String),
}

//! ClusterClient trait for mocking
//!
//! This trait abstracts the ClusterClient to enable mocking in unit tests.
//! The concrete ClusterClient implements this trait, and tests can use mock implementations.

use crate::error::ClusterError;
use crate::models::{NodeCapacity, ScaleTarget};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

/// Trait for the cluster API operations used by the nanny
///
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait ClusterClientTrait: Send + Sync {
    // Ownership
    async fn pod_metadata(&self, namespace: &str, name: &str) -> Result<ObjectMeta, ClusterError>;
    async fn replica_set_metadata(&self, namespace: &str, name: &str) -> Result<ObjectMeta, ClusterError>;

    // Capacity
    async fn list_nodes(&self) -> Result<Vec<NodeCapacity>, ClusterError>;

    // Scaling
    /// Current `spec.replicas` of the target; an unset field reads as 1
    async fn get_replicas(&self, target: &ScaleTarget) -> Result<i32, ClusterError>;
    async fn set_replicas(&self, target: &ScaleTarget, replicas: i32) -> Result<(), ClusterError>;
}

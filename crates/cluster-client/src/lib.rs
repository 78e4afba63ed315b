//! Cluster API Client
//!
//! The slice of the Kubernetes API the pod nanny needs:
//!
//! - **Ownership**: pod and ReplicaSet metadata, for walking owner chains
//! - **Capacity**: node inventory with schedulability and CPU capacity
//! - **Scaling**: reading and writing `spec.replicas` on ReplicationControllers,
//!   ReplicaSets and Deployments
//!
//! # Example
//!
//! ```no_run
//! use cluster_client::{ClusterClient, ClusterClientTrait, ScaleTarget, WorkloadKind};
//!
//! # async fn example() -> Result<(), cluster_client::ClusterError> {
//! let client = ClusterClient::try_default().await?;
//!
//! let nodes = client.list_nodes().await?;
//! println!("{} nodes", nodes.len());
//!
//! let target = ScaleTarget::new(WorkloadKind::Deployment, "kube-system", "kube-dns");
//! let replicas = client.get_replicas(&target).await?;
//! client.set_replicas(&target, replicas + 1).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod models;
#[path = "trait.rs"]
pub mod cluster_trait;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;

pub use client::ClusterClient;
pub use cluster_trait::ClusterClientTrait;
pub use error::ClusterError;
pub use models::*;
#[cfg(any(test, feature = "test-util"))]
pub use mock::MockClusterClient;

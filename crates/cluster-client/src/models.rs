//! Cluster API models
//!
//! Plain views of the Kubernetes objects the nanny reads and writes.

use crate::error::ClusterError;
use k8s_openapi::api::core::v1::Node;
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Resource name of CPU capacity in a node's status
pub const CPU_RESOURCE: &str = "cpu";

/// Annotation carrying the legacy serialized controller reference
pub const CREATED_BY_ANNOTATION: &str = "kubernetes.io/created-by";

/// Kinds of workload whose replica count the nanny can manage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkloadKind {
    ReplicationController,
    ReplicaSet,
    Deployment,
}

impl WorkloadKind {
    /// The Kubernetes `kind` string
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkloadKind::ReplicationController => "ReplicationController",
            WorkloadKind::ReplicaSet => "ReplicaSet",
            WorkloadKind::Deployment => "Deployment",
        }
    }
}

impl fmt::Display for WorkloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkloadKind {
    type Err = ClusterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ReplicationController" => Ok(WorkloadKind::ReplicationController),
            "ReplicaSet" => Ok(WorkloadKind::ReplicaSet),
            "Deployment" => Ok(WorkloadKind::Deployment),
            other => Err(ClusterError::UnsupportedKind(other.to_string())),
        }
    }
}

/// The object whose `spec.replicas` is read and written
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScaleTarget {
    pub kind: WorkloadKind,
    pub namespace: String,
    pub name: String,
}

impl ScaleTarget {
    pub fn new(kind: WorkloadKind, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind,
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ScaleTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}/{}", self.kind, self.namespace, self.name)
    }
}

/// One node as seen by the capacity sampler
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeCapacity {
    pub name: String,
    /// Set when the node is cordoned
    pub unschedulable: bool,
    /// Advertised CPU capacity, if the node reports one
    pub cpu: Option<Quantity>,
}

impl From<&Node> for NodeCapacity {
    fn from(node: &Node) -> Self {
        Self {
            name: node.metadata.name.clone().unwrap_or_default(),
            unschedulable: node
                .spec
                .as_ref()
                .and_then(|spec| spec.unschedulable)
                .unwrap_or(false),
            cpu: node
                .status
                .as_ref()
                .and_then(|status| status.capacity.as_ref())
                .and_then(|capacity| capacity.get(CPU_RESOURCE))
                .cloned(),
        }
    }
}

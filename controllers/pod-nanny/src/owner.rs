//! Owner resolution.
//!
//! Walks a pod's controller chain to find the workload whose replica count
//! the nanny manages. The chain is at most two hops deep:
//!
//! - Pod → ReplicationController
//! - Pod → ReplicaSet
//! - Pod → ReplicaSet → Deployment
//!
//! A controller is read from the `controller: true` owner reference, or
//! failing that from the legacy `kubernetes.io/created-by` annotation.

use crate::error::ControllerError;
use cluster_client::{ClusterClientTrait, ScaleTarget, WorkloadKind, CREATED_BY_ANNOTATION};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::Deserialize;
use std::fmt;
use tracing::{debug, info};

/// The workload owning the nanny's pod.
///
/// Resolved once at startup and never re-read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkloadReference {
    ReplicationController {
        namespace: String,
        name: String,
    },
    /// A ReplicaSet, scaled through its Deployment when it has one
    ReplicaSet {
        namespace: String,
        name: String,
        deployment: Option<String>,
    },
}

impl WorkloadReference {
    /// The object whose `spec.replicas` the nanny adjusts
    pub fn scale_target(&self) -> ScaleTarget {
        match self {
            WorkloadReference::ReplicationController { namespace, name } => {
                ScaleTarget::new(WorkloadKind::ReplicationController, namespace, name)
            }
            WorkloadReference::ReplicaSet {
                namespace,
                deployment: Some(deployment),
                ..
            } => ScaleTarget::new(WorkloadKind::Deployment, namespace, deployment),
            WorkloadReference::ReplicaSet { namespace, name, .. } => {
                ScaleTarget::new(WorkloadKind::ReplicaSet, namespace, name)
            }
        }
    }
}

impl fmt::Display for WorkloadReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkloadReference::ReplicationController { namespace, name } => {
                write!(f, "ReplicationController {}/{}", namespace, name)
            }
            WorkloadReference::ReplicaSet {
                namespace,
                name,
                deployment,
            } => {
                write!(f, "ReplicaSet {}/{}", namespace, name)?;
                if let Some(deployment) = deployment {
                    write!(f, " of Deployment {}/{}", namespace, deployment)?;
                }
                Ok(())
            }
        }
    }
}

/// Controlling object named in some metadata
#[derive(Debug, Clone, PartialEq, Eq)]
struct ControllerRef {
    kind: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct SerializedReference {
    reference: ReferencedObject,
}

#[derive(Debug, Deserialize)]
struct ReferencedObject {
    #[serde(default)]
    kind: String,
    #[serde(default)]
    name: String,
}

/// Read the controlling object from metadata.
///
/// `Ok(None)` means the object has no controller.
fn controller_ref(meta: &ObjectMeta) -> Result<Option<ControllerRef>, String> {
    if let Some(owner) = meta
        .owner_references
        .iter()
        .flatten()
        .find(|r| r.controller == Some(true))
    {
        return Ok(Some(ControllerRef {
            kind: owner.kind.clone(),
            name: owner.name.clone(),
        }));
    }

    let payload = match meta
        .annotations
        .as_ref()
        .and_then(|a| a.get(CREATED_BY_ANNOTATION))
    {
        Some(payload) if !payload.trim().is_empty() => payload,
        _ => return Ok(None),
    };

    let annotation: SerializedReference = serde_json::from_str(payload)
        .map_err(|e| format!("failed to parse {} annotation ({})", CREATED_BY_ANNOTATION, e))?;
    let reference = annotation.reference;
    if reference.kind.is_empty() || reference.name.is_empty() {
        return Err(format!(
            "{} annotation does not name a kind and name",
            CREATED_BY_ANNOTATION
        ));
    }
    Ok(Some(ControllerRef {
        kind: reference.kind,
        name: reference.name,
    }))
}

/// Find the workload that owns `namespace/pod`.
///
/// Fails with [`ControllerError::Ownership`] for a standalone pod, a pod
/// whose controller is not a ReplicationController or ReplicaSet, a
/// ReplicaSet controlled by anything but a Deployment, or an unreadable
/// owner payload.
pub async fn resolve_owner<C>(
    client: &C,
    namespace: &str,
    pod: &str,
) -> Result<WorkloadReference, ControllerError>
where
    C: ClusterClientTrait + ?Sized,
{
    let meta = client.pod_metadata(namespace, pod).await?;
    let owner = controller_ref(&meta)
        .map_err(|e| ControllerError::Ownership(format!("pod {}/{}: {}", namespace, pod, e)))?
        .ok_or_else(|| {
            ControllerError::Ownership(format!(
                "standalone pod {}/{} has no controlling ReplicationController or ReplicaSet",
                namespace, pod
            ))
        })?;
    debug!("Pod {}/{} is controlled by {} {}", namespace, pod, owner.kind, owner.name);

    match owner.kind.parse::<WorkloadKind>() {
        Ok(WorkloadKind::ReplicationController) => Ok(WorkloadReference::ReplicationController {
            namespace: namespace.to_string(),
            name: owner.name,
        }),
        Ok(WorkloadKind::ReplicaSet) => {
            let deployment = resolve_deployment(client, namespace, &owner.name).await?;
            Ok(WorkloadReference::ReplicaSet {
                namespace: namespace.to_string(),
                name: owner.name,
                deployment,
            })
        }
        _ => Err(ControllerError::Ownership(format!(
            "pod {}/{} was not created by a ReplicationController or ReplicaSet (controller is {} {})",
            namespace, pod, owner.kind, owner.name
        ))),
    }
}

/// The Deployment controlling a ReplicaSet, if any
async fn resolve_deployment<C>(
    client: &C,
    namespace: &str,
    replica_set: &str,
) -> Result<Option<String>, ControllerError>
where
    C: ClusterClientTrait + ?Sized,
{
    let meta = client.replica_set_metadata(namespace, replica_set).await?;
    let owner = controller_ref(&meta).map_err(|e| {
        ControllerError::Ownership(format!("replicaset {}/{}: {}", namespace, replica_set, e))
    })?;

    match owner {
        None => {
            info!(
                "ReplicaSet {}/{} has no controlling Deployment, scaling the ReplicaSet directly",
                namespace, replica_set
            );
            Ok(None)
        }
        Some(owner) if owner.kind == WorkloadKind::Deployment.as_str() => Ok(Some(owner.name)),
        Some(owner) => Err(ControllerError::Ownership(format!(
            "replicaset {}/{} was not created by a Deployment (controller is {} {})",
            namespace, replica_set, owner.kind, owner.name
        ))),
    }
}

#[cfg(test)]
#[path = "owner_test.rs"]
mod owner_test;

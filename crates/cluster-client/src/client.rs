//! Kubernetes-backed cluster client
//!
//! Implements [`ClusterClientTrait`] on top of `kube::Api`. ReplicationControllers
//! live in `core/v1`; ReplicaSets and Deployments in `apps/v1`.

use crate::cluster_trait::ClusterClientTrait;
use crate::error::ClusterError;
use crate::models::{NodeCapacity, ScaleTarget, WorkloadKind};
use k8s_openapi::api::apps::v1::{Deployment, ReplicaSet};
use k8s_openapi::api::core::v1::{Node, Pod, ReplicationController};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::api::{ListParams, Patch, PatchParams};
use kube::{Api, Client};
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use tracing::debug;

/// Replica count the API server assumes when `spec.replicas` is unset
const DEFAULT_REPLICAS: i32 = 1;

/// Cluster API client
#[derive(Clone)]
pub struct ClusterClient {
    client: Client,
}

impl ClusterClient {
    /// Create a cluster client from an existing Kubernetes client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create a cluster client from the in-cluster service account, falling
    /// back to the local kubeconfig
    pub async fn try_default() -> Result<Self, ClusterError> {
        let client = Client::try_default().await?;
        Ok(Self::new(client))
    }

    fn namespaced<K>(&self, namespace: &str) -> Api<K>
    where
        K: kube::Resource<Scope = k8s_openapi::NamespaceResourceScope>,
        <K as kube::Resource>::DynamicType: Default,
    {
        Api::namespaced(self.client.clone(), namespace)
    }
}

impl Debug for ClusterClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterClient").finish_non_exhaustive()
    }
}

/// Merge-patch `spec.replicas` on a namespaced workload
async fn patch_replicas<K>(api: Api<K>, name: &str, replicas: i32) -> Result<(), ClusterError>
where
    K: Clone + DeserializeOwned + Debug,
{
    let patch = serde_json::json!({
        "spec": {
            "replicas": replicas
        }
    });
    api.patch(name, &PatchParams::default(), &Patch::Merge(&patch))
        .await?;
    Ok(())
}

#[async_trait::async_trait]
impl ClusterClientTrait for ClusterClient {
    async fn pod_metadata(&self, namespace: &str, name: &str) -> Result<ObjectMeta, ClusterError> {
        debug!("Fetching pod {}/{}", namespace, name);
        let pod = self.namespaced::<Pod>(namespace).get(name).await?;
        Ok(pod.metadata)
    }

    async fn replica_set_metadata(&self, namespace: &str, name: &str) -> Result<ObjectMeta, ClusterError> {
        debug!("Fetching replicaset {}/{}", namespace, name);
        let rs = self.namespaced::<ReplicaSet>(namespace).get(name).await?;
        Ok(rs.metadata)
    }

    async fn list_nodes(&self) -> Result<Vec<NodeCapacity>, ClusterError> {
        let nodes: Api<Node> = Api::all(self.client.clone());
        let list = nodes.list(&ListParams::default()).await?;
        debug!("Listed {} nodes", list.items.len());
        Ok(list.items.iter().map(NodeCapacity::from).collect())
    }

    async fn get_replicas(&self, target: &ScaleTarget) -> Result<i32, ClusterError> {
        let ns = target.namespace.as_str();
        let name = target.name.as_str();
        let replicas = match target.kind {
            WorkloadKind::ReplicationController => self
                .namespaced::<ReplicationController>(ns)
                .get(name)
                .await?
                .spec
                .and_then(|spec| spec.replicas),
            WorkloadKind::ReplicaSet => self
                .namespaced::<ReplicaSet>(ns)
                .get(name)
                .await?
                .spec
                .and_then(|spec| spec.replicas),
            WorkloadKind::Deployment => self
                .namespaced::<Deployment>(ns)
                .get(name)
                .await?
                .spec
                .and_then(|spec| spec.replicas),
        };
        Ok(replicas.unwrap_or(DEFAULT_REPLICAS))
    }

    async fn set_replicas(&self, target: &ScaleTarget, replicas: i32) -> Result<(), ClusterError> {
        debug!("Patching {} to {} replicas", target, replicas);
        let ns = target.namespace.as_str();
        match target.kind {
            WorkloadKind::ReplicationController => {
                patch_replicas(self.namespaced::<ReplicationController>(ns), &target.name, replicas).await
            }
            WorkloadKind::ReplicaSet => {
                patch_replicas(self.namespaced::<ReplicaSet>(ns), &target.name, replicas).await
            }
            WorkloadKind::Deployment => {
                patch_replicas(self.namespaced::<Deployment>(ns), &target.name, replicas).await
            }
        }
    }
}

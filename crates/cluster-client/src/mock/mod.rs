//! Mock ClusterClient for unit testing
//!
//! This module provides a mock implementation of ClusterClientTrait that can be used
//! in unit tests without requiring a running API server.
//!
//! - `helpers.rs` - Builders for owner metadata and nodes

mod helpers;

pub use helpers::*;

use crate::cluster_trait::ClusterClientTrait;
use crate::error::ClusterError;
use crate::models::{NodeCapacity, ScaleTarget};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Operations that can be made to fail on demand
#[derive(Debug, Clone, Copy, Default)]
struct Failures {
    list_nodes: bool,
    get_replicas: bool,
    set_replicas: bool,
}

/// Mock ClusterClient for testing
///
/// This mock stores objects in memory, records every replica update, and can
/// be configured to fail individual operations.
#[derive(Debug, Clone, Default)]
pub struct MockClusterClient {
    pods: Arc<Mutex<HashMap<(String, String), ObjectMeta>>>,
    replica_sets: Arc<Mutex<HashMap<(String, String), ObjectMeta>>>,
    nodes: Arc<Mutex<Vec<NodeCapacity>>>,
    replicas: Arc<Mutex<HashMap<ScaleTarget, i32>>>,
    failures: Arc<Mutex<Failures>>,
    // Call tracking
    updates: Arc<Mutex<Vec<(ScaleTarget, i32)>>>,
    pod_lookups: Arc<Mutex<usize>>,
    replica_set_lookups: Arc<Mutex<usize>>,
}

impl MockClusterClient {
    /// Create an empty mock cluster
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pod's metadata (for test setup)
    pub fn add_pod(&self, namespace: &str, name: &str, metadata: ObjectMeta) {
        self.pods
            .lock()
            .unwrap()
            .insert((namespace.to_string(), name.to_string()), metadata);
    }

    /// Add a ReplicaSet's metadata (for test setup)
    pub fn add_replica_set(&self, namespace: &str, name: &str, metadata: ObjectMeta) {
        self.replica_sets
            .lock()
            .unwrap()
            .insert((namespace.to_string(), name.to_string()), metadata);
    }

    /// Add a node to the inventory (for test setup)
    pub fn add_node(&self, node: NodeCapacity) {
        self.nodes.lock().unwrap().push(node);
    }

    /// Replace the node inventory
    pub fn set_nodes(&self, nodes: Vec<NodeCapacity>) {
        *self.nodes.lock().unwrap() = nodes;
    }

    /// Set a workload's current replica count (for test setup)
    pub fn set_workload_replicas(&self, target: ScaleTarget, replicas: i32) {
        self.replicas.lock().unwrap().insert(target, replicas);
    }

    /// Current replica count of a workload, if it exists
    pub fn workload_replicas(&self, target: &ScaleTarget) -> Option<i32> {
        self.replicas.lock().unwrap().get(target).copied()
    }

    /// Make `list_nodes` fail
    pub fn fail_list_nodes(&self, fail: bool) {
        self.failures.lock().unwrap().list_nodes = fail;
    }

    /// Make `get_replicas` fail
    pub fn fail_get_replicas(&self, fail: bool) {
        self.failures.lock().unwrap().get_replicas = fail;
    }

    /// Make `set_replicas` fail
    pub fn fail_set_replicas(&self, fail: bool) {
        self.failures.lock().unwrap().set_replicas = fail;
    }

    /// Every successful `set_replicas` call, in order
    pub fn replica_updates(&self) -> Vec<(ScaleTarget, i32)> {
        self.updates.lock().unwrap().clone()
    }

    /// Number of pod metadata lookups made
    pub fn pod_lookups(&self) -> usize {
        *self.pod_lookups.lock().unwrap()
    }

    /// Number of ReplicaSet metadata lookups made
    pub fn replica_set_lookups(&self) -> usize {
        *self.replica_set_lookups.lock().unwrap()
    }
}

fn lookup(
    store: &Mutex<HashMap<(String, String), ObjectMeta>>,
    what: &str,
    namespace: &str,
    name: &str,
) -> Result<ObjectMeta, ClusterError> {
    store
        .lock()
        .unwrap()
        .get(&(namespace.to_string(), name.to_string()))
        .cloned()
        .ok_or_else(|| ClusterError::NotFound(format!("{} {}/{}", what, namespace, name)))
}

#[async_trait::async_trait]
impl ClusterClientTrait for MockClusterClient {
    async fn pod_metadata(&self, namespace: &str, name: &str) -> Result<ObjectMeta, ClusterError> {
        *self.pod_lookups.lock().unwrap() += 1;
        lookup(&self.pods, "pod", namespace, name)
    }

    async fn replica_set_metadata(&self, namespace: &str, name: &str) -> Result<ObjectMeta, ClusterError> {
        *self.replica_set_lookups.lock().unwrap() += 1;
        lookup(&self.replica_sets, "replicaset", namespace, name)
    }

    async fn list_nodes(&self) -> Result<Vec<NodeCapacity>, ClusterError> {
        if self.failures.lock().unwrap().list_nodes {
            return Err(ClusterError::Api("injected failure listing nodes".to_string()));
        }
        Ok(self.nodes.lock().unwrap().clone())
    }

    async fn get_replicas(&self, target: &ScaleTarget) -> Result<i32, ClusterError> {
        if self.failures.lock().unwrap().get_replicas {
            return Err(ClusterError::Api(format!("injected failure reading {}", target)));
        }
        self.workload_replicas(target)
            .ok_or_else(|| ClusterError::NotFound(target.to_string()))
    }

    async fn set_replicas(&self, target: &ScaleTarget, replicas: i32) -> Result<(), ClusterError> {
        if self.failures.lock().unwrap().set_replicas {
            return Err(ClusterError::Api(format!("injected failure updating {}", target)));
        }
        let mut store = self.replicas.lock().unwrap();
        let current = store
            .get_mut(target)
            .ok_or_else(|| ClusterError::NotFound(target.to_string()))?;
        *current = replicas;
        self.updates.lock().unwrap().push((target.clone(), replicas));
        Ok(())
    }
}

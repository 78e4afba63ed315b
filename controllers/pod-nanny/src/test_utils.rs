//! Test utilities for unit testing the reconciler and controller
//!
//! This module provides helpers for creating test clusters and parameter files.

use crate::owner::WorkloadReference;
use crate::reconciler::Reconciler;
use cluster_client::mock::node;
use cluster_client::{MockClusterClient, ScaleTarget};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

pub const NAMESPACE: &str = "kube-system";

/// The ladder used across tests: 0 cores → 1, 4 → 2, 8 → 4
pub const LADDER_PARAMS: &str =
    r#"{"replicas": {"cores_per_replica": {"0": 1, "4": 2, "8": 4}}}"#;

/// Write a scaling parameters document to a temporary file
pub fn write_params(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

/// A Deployment-owned workload reference
pub fn deployment_workload() -> WorkloadReference {
    WorkloadReference::ReplicaSet {
        namespace: NAMESPACE.to_string(),
        name: "kube-dns-5f8d9".to_string(),
        deployment: Some("kube-dns".to_string()),
    }
}

/// Mock cluster of `cores.len()` schedulable nodes with the given core counts,
/// where the deployment currently runs `replicas` replicas
pub fn create_test_cluster(cores: &[u32], replicas: i32) -> MockClusterClient {
    let mock = MockClusterClient::new();
    mock.set_nodes(
        cores
            .iter()
            .enumerate()
            .map(|(i, c)| node(&format!("node-{i}"), &c.to_string(), false))
            .collect(),
    );
    mock.set_workload_replicas(deployment_workload().scale_target(), replicas);
    mock
}

/// Build a reconciler over the mock for the deployment workload
pub fn create_test_reconciler(mock: &MockClusterClient, params: &NamedTempFile) -> Reconciler {
    Reconciler::new(Arc::new(mock.clone()), deployment_workload(), params.path())
}

pub fn deployment_target() -> ScaleTarget {
    deployment_workload().scale_target()
}

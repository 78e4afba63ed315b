//! Builders for mock cluster objects

use crate::models::{NodeCapacity, WorkloadKind, CREATED_BY_ANNOTATION};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ObjectMeta, OwnerReference};
use std::collections::BTreeMap;

/// Build a node with the given CPU capacity string
pub fn node(name: &str, cpu: &str, unschedulable: bool) -> NodeCapacity {
    NodeCapacity {
        name: name.to_string(),
        unschedulable,
        cpu: Some(Quantity(cpu.to_string())),
    }
}

/// Metadata with no owner at all
pub fn standalone_metadata(name: &str) -> ObjectMeta {
    ObjectMeta {
        name: Some(name.to_string()),
        ..Default::default()
    }
}

/// Metadata whose controlling owner reference names `kind`/`owner`
pub fn owned_by(name: &str, kind: &str, owner: &str) -> ObjectMeta {
    let api_version = match kind.parse::<WorkloadKind>() {
        Ok(WorkloadKind::ReplicationController) => "v1",
        _ => "apps/v1",
    };
    ObjectMeta {
        name: Some(name.to_string()),
        owner_references: Some(vec![OwnerReference {
            api_version: api_version.to_string(),
            kind: kind.to_string(),
            name: owner.to_string(),
            uid: format!("uid-{}", owner),
            controller: Some(true),
            block_owner_deletion: Some(true),
        }]),
        ..Default::default()
    }
}

/// Metadata carrying the legacy `kubernetes.io/created-by` annotation
pub fn created_by(name: &str, kind: &str, owner: &str) -> ObjectMeta {
    let payload = serde_json::json!({
        "kind": "SerializedReference",
        "apiVersion": "v1",
        "reference": {
            "kind": kind,
            "name": owner,
            "apiVersion": "v1",
        }
    });
    with_created_by(name, &payload.to_string())
}

/// Metadata carrying an arbitrary `kubernetes.io/created-by` payload
pub fn with_created_by(name: &str, payload: &str) -> ObjectMeta {
    ObjectMeta {
        name: Some(name.to_string()),
        annotations: Some(BTreeMap::from([(
            CREATED_BY_ANNOTATION.to_string(),
            payload.to_string(),
        )])),
        ..Default::default()
    }
}

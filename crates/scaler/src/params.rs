//! Scaling parameters document.
//!
//! Parses the JSON parameters file and turns its `replicas` section into a
//! validated [`ScalingLadder`].

use crate::error::ParamsError;
use crate::ladder::ScalingLadder;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// Replica scaling parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplicaParams {
    /// Schedulable core threshold (as a JSON object key) to replica count
    #[serde(default)]
    pub cores_per_replica: BTreeMap<String, i64>,
}

/// Top-level scaling parameters document.
///
/// Sections other than `replicas` are accepted and ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScalerParams {
    pub replicas: ReplicaParams,
}

impl ScalerParams {
    /// Parse a parameters document from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ParamsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse the parameters file at `path`
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ParamsError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ParamsError::NotFound(path.to_path_buf()),
            _ => ParamsError::Unreadable {
                path: path.to_path_buf(),
                source: e,
            },
        })?;
        debug!("Read {} bytes of scaling parameters from {}", contents.len(), path.display());
        Self::from_json(&contents)
    }

    /// Validate the `replicas` section and build the ladder from it
    pub fn ladder(&self) -> Result<ScalingLadder, ParamsError> {
        let steps = self
            .replicas
            .cores_per_replica
            .iter()
            .map(|(key, replicas)| parse_threshold(key).map(|threshold| (threshold, *replicas)))
            .collect::<Result<Vec<_>, _>>()?;
        ScalingLadder::new(steps)
    }
}

/// Load the ladder from the parameters file at `path`.
///
/// The file is read on every call so that edits to a mounted ConfigMap
/// volume are picked up without restarting.
pub fn load_ladder(path: impl AsRef<Path>) -> Result<ScalingLadder, ParamsError> {
    ScalerParams::from_file(path)?.ladder()
}

fn parse_threshold(key: &str) -> Result<u32, ParamsError> {
    // u32::from_str accepts a leading '+', which is not a plain threshold
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParamsError::InvalidThreshold(key.to_string()));
    }
    key.parse::<u32>()
        .map_err(|_| ParamsError::InvalidThreshold(key.to_string()))
}

#[cfg(test)]
#[path = "params_test.rs"]
mod params_test;
